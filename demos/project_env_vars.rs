//! Lists, creates and deletes project environment variables.
//!
//! Run with:
//! `CIRCLECI_TOKEN=... cargo run --example project_env_vars -- gh acme widgets`

use circleci_client::{project_slug, ClientBuilder, Error, ListOptions};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("circleci_client=debug,project_env_vars=info")
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [provider, org, repo] = args.as_slice() else {
        eprintln!("usage: project_env_vars <provider> <org> <repo>");
        std::process::exit(2);
    };
    let slug = project_slug(provider, org, repo);

    let client = ClientBuilder::from_env()?.build()?;

    let project = client.projects().get(&slug).await?;
    println!("=== {} ({}) ===", project.name, project.vcs_info.vcs_url);

    // Walk every page by hand.
    let mut options = ListOptions::default();
    loop {
        let page = client.env_vars().list_with(&slug, &options).await?;
        for var in &page.items {
            println!("{} = {}", var.name, var.value);
        }
        match page.next_page() {
            Some(next) => options = next,
            None => break,
        }
    }

    let created = client
        .env_vars()
        .create(&slug, "CIRCLECI_CLIENT_DEMO", "hello")
        .await?;
    println!("Created {} (masked value {})", created.name, created.value);

    client.env_vars().delete(&slug, "CIRCLECI_CLIENT_DEMO").await?;
    println!("Deleted {}", created.name);

    Ok(())
}
