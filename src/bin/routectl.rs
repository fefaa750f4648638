use clap::{Parser, Subcommand};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

use route_keeper::document::walk::render_outline;
use route_keeper::document::Node;

#[derive(Parser)]
#[command(name = "routectl")]
#[command(about = "Management CLI for the route-keeper admin API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:7000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a route (router, redirect middleware and service)
    Add {
        name: String,
        /// Upstream URL, e.g. http://10.0.0.5:8080
        #[arg(long)]
        address: String,
        #[arg(long)]
        host: String,
        #[arg(long)]
        useragent: String,
        #[arg(long)]
        redirect_url: String,
    },
    /// Delete a route and everything derived from it
    Delete { name: String },
    /// Change an existing user-agent binding
    UserAgent { path: String, useragent: String },
    /// Print the whole http section as JSON
    Settings,
    /// Print the whole http section as an indented outline
    Tree,
    /// List routes and whether each is complete
    Routes,
    /// Read the value at a dotted path
    Get { path: String },
    /// Write a JSON value at a dotted path
    Set { path: String, value: String },
    /// Remove the value at a dotted path
    Unset { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = Client::new();
    let url = |endpoint: &str| format!("{}{}", cli.url, endpoint);

    let request: RequestBuilder = match cli.command {
        Commands::Add {
            name,
            address,
            host,
            useragent,
            redirect_url,
        } => client.post(url("/addroute")).json(&json!({
            "name": name,
            "address": address,
            "host": host,
            "useragent": useragent,
            "redirect_url": redirect_url,
        })),
        Commands::Delete { name } => client
            .post(url("/deleteroute"))
            .json(&json!({ "name": name })),
        Commands::UserAgent { path, useragent } => client
            .post(url("/useragent"))
            .json(&json!({ "path": path, "useragent": useragent })),
        Commands::Settings => client.get(url("/settings")),
        Commands::Tree => {
            let res = client.get(url("/settings")).send().await?;
            if let Some(json) = check(res).await? {
                print!("{}", render_outline(&Node::from(json)));
            }
            return Ok(());
        }
        Commands::Routes => client.get(url("/routes")),
        Commands::Get { path } => client.get(url("/value")).query(&[("path", path)]),
        Commands::Set { path, value } => {
            let parsed = serde_json::from_str::<Value>(&value);
            let value = parsed.unwrap_or(Value::String(value));
            client
                .put(url("/value"))
                .json(&json!({ "path": path, "value": value }))
        }
        Commands::Unset { path } => client.delete(url("/value")).query(&[("path", path)]),
    };

    if let Some(json) = check(request.send().await?).await? {
        println!("{}", serde_json::to_string_pretty(&json)?);
    }
    Ok(())
}

/// Body of a successful response; errors are printed and yield `None`.
async fn check(res: reqwest::Response) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(None);
    }
    Ok(Some(res.json().await?))
}
