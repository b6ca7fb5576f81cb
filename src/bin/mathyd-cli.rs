use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::{json, Value};

use mathyd::security::integrity::{sign, HMAC_HEADER};

#[derive(Parser)]
#[command(name = "mathyd-cli")]
#[command(about = "Client for the mathyd rendering service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Shared HMAC key.
    #[arg(short, long, env = "MATHYD_HMAC_KEY", default_value = "", hide_env_values = true)]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render TeX and print the markup
    Render {
        tex: String,
        #[arg(long)]
        inline: bool,
        #[arg(long)]
        em: Option<f64>,
        #[arg(long)]
        ex: Option<f64>,
        #[arg(long)]
        width: Option<f64>,
    },
    /// Print the HMAC of a request body
    Sign { body: String },
    /// Fetch the service usage page
    Help,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Render {
            tex,
            inline,
            em,
            ex,
            width,
        } => {
            let mut body = json!({ "type": "svg", "tex": tex, "inline": inline });
            for (field, value) in [("em", em), ("ex", ex), ("width", width)] {
                if let Some(value) = value {
                    body[field] = json!(value);
                }
            }
            let body = serde_json::to_vec(&body)?;

            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.insert(HMAC_HEADER, HeaderValue::from_str(&sign(cli.key.as_bytes(), &body)?)?);

            let res = client
                .put(&cli.url)
                .headers(headers)
                .body(body)
                .send()
                .await?;
            print_render(res).await?;
        }
        Commands::Sign { body } => {
            println!("{}", sign(cli.key.as_bytes(), body.as_bytes())?);
        }
        Commands::Help => {
            let res = client.get(&cli.url).send().await?;
            println!("{}", res.text().await?);
        }
    }

    Ok(())
}

async fn print_render(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: mathyd returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    match json.get("svg").and_then(Value::as_str) {
        Some(markup) => println!("{}", markup),
        None => println!("{}", serde_json::to_string_pretty(&json)?),
    }
    Ok(())
}
