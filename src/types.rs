//! Shapes shared by several resource families.

use serde::{Deserialize, Deserializer, Serialize};

/// A status message returned by action endpoints and carried by error
/// payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    #[serde(
        rename = "type",
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub reason: String,
}

/// One page of a list endpoint.
///
/// `next_page_token` is set when more pages exist. Nothing is fetched
/// automatically: pass [`List::next_page`] to the matching `*_with` method to
/// get the following page.
///
/// # Examples
///
/// ```no_run
/// use circleci_client::{project_slug, Client, ListOptions};
///
/// # async fn example() -> Result<(), circleci_client::Error> {
/// let client = Client::new("my-token")?;
/// let slug = project_slug("gh", "acme", "widgets");
///
/// let mut options = ListOptions::default();
/// loop {
///     let page = client.env_vars().list_with(&slug, &options).await?;
///     for var in &page.items {
///         println!("{} = {}", var.name, var.value);
///     }
///     match page.next_page() {
///         Some(next) => options = next,
///         None => break,
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de>"))]
pub struct List<T> {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_page_token: None,
        }
    }
}

impl<T> List<T> {
    /// Whether the server reported further pages.
    pub fn has_more(&self) -> bool {
        self.next_page_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Options requesting the page after this one, if there is one.
    pub fn next_page(&self) -> Option<ListOptions> {
        if !self.has_more() {
            return None;
        }
        Some(ListOptions {
            page_token: self.next_page_token.clone(),
        })
    }
}

/// Query options accepted by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListOptions {
    /// Continuation token from a previous page.
    #[serde(rename = "page-token", skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

impl ListOptions {
    /// Options requesting the page identified by `token`.
    pub fn page_token(token: impl Into<String>) -> Self {
        Self {
            page_token: Some(token.into()),
        }
    }
}

/// Builds a project slug of the form `{provider}/{organization}/{repository}`.
///
/// `provider` is `gh` (or `github`) for GitHub and `bb` (or `bitbucket`) for
/// Bitbucket. The parts are not validated.
///
/// ```
/// assert_eq!(circleci_client::project_slug("gh", "org", "repo"), "gh/org/repo");
/// ```
pub fn project_slug(provider: &str, organization: &str, repository: &str) -> String {
    format!("{}/{}/{}", provider, organization, repository)
}

/// Deserializes an explicit `null` to the type's default, the same as an
/// absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_slug() {
        assert_eq!(project_slug("gh", "org", "repo"), "gh/org/repo");
        assert_eq!(project_slug("", "", ""), "//");
    }

    #[test]
    fn test_list_decodes_missing_fields() {
        let list: List<Message> = serde_json::from_str("{}").unwrap();
        assert!(list.items.is_empty());
        assert!(!list.has_more());
        assert_eq!(list.next_page(), None);

        let list: List<Message> =
            serde_json::from_str(r#"{"items":[{"message":"hi"}],"next_page_token":null}"#)
                .unwrap();
        assert_eq!(list.items[0].message, "hi");
        assert!(!list.has_more());
    }

    #[test]
    fn test_list_next_page() {
        let list: List<Message> =
            serde_json::from_str(r#"{"items":[],"next_page_token":"abc"}"#).unwrap();
        assert!(list.has_more());
        assert_eq!(list.next_page(), Some(ListOptions::page_token("abc")));
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let message: Message =
            serde_json::from_str(r#"{"type":null,"message":"x","reason":null}"#).unwrap();
        assert_eq!(message.kind, "");
        assert_eq!(message.reason, "");
    }

    #[test]
    fn test_message_round_trip() {
        let raw = r#"{"type":"error","message":"Not Found","reason":"missing"}"#;
        let message: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(message.kind, "error");
        assert_eq!(serde_json::to_string(&message).unwrap(), raw);
    }
}
