//! Call Salesforce from the command line through a managed session.
//!
//! Reads the same `SALESFORCE_*` variables as `ApiClient::from_env`.
//!
//! ```sh
//! export SALESFORCE_ENDPOINT=https://login.salesforce.com/services/oauth2/token
//! export SALESFORCE_CLIENT_ID=... SALESFORCE_CLIENT_SECRET=...
//! export SALESFORCE_USERNAME=... SALESFORCE_PASSWORD=...
//! export SALESFORCE_REST_API=/services/data/v62.0/sobjects
//! export SALESFORCE_SERVICE_QUERY=/services/data/v62.0/query?q=
//! export SALESFORCE_RECONNECT_ATTEMPTS=2
//!
//! sf-call query 'SELECT Id FROM Contact WHERE Email = $1' -p a@b.com
//! sf-call rest post Contact --body '{"LastName":"Smith"}'
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sfconn::{ApiClient, QueryParam, RequestMethod, RestActionRequest};

#[derive(Parser)]
#[command(name = "sf-call")]
#[command(about = "Run SOQL queries and REST actions against Salesforce")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a SOQL query with positional $1, $2, ... parameters
    Query {
        /// SOQL template
        template: String,
        /// Parameter value, in order. Prefix with int:, float:, bool: or
        /// date: for a typed literal; `null` for null; anything else is text
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<QueryParam>,
    },
    /// Run a REST action against an SObject
    Rest {
        /// HTTP method (get, post, patch, put, delete)
        method: RequestMethod,
        /// Resource type, e.g. Contact
        resource_type: String,
        /// Record ID
        #[arg(long)]
        id: Option<String>,
        /// JSON body
        #[arg(long)]
        body: Option<String>,
    },
}

fn parse_param(raw: &str) -> std::result::Result<QueryParam, String> {
    if raw == "null" {
        return Ok(QueryParam::Null);
    }
    let Some((kind, value)) = raw.split_once(':') else {
        return Ok(QueryParam::from(raw));
    };
    match kind {
        "int" => value
            .parse::<i64>()
            .map(QueryParam::Int)
            .map_err(|e| format!("invalid int {value:?}: {e}")),
        "float" => value
            .parse::<f64>()
            .map(QueryParam::Float)
            .map_err(|e| format!("invalid float {value:?}: {e}")),
        "bool" => value
            .parse::<bool>()
            .map(QueryParam::Bool)
            .map_err(|e| format!("invalid bool {value:?}: {e}")),
        "date" => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(QueryParam::Date)
            .map_err(|e| format!("invalid date {value:?}: {e}")),
        "text" => Ok(QueryParam::from(value)),
        _ => Ok(QueryParam::from(raw)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ApiClient::from_env().context("failed to configure Salesforce client")?;
    debug!(
        max_reattempts = client.config().max_reattempts,
        "Client configured from environment"
    );

    let output = match cli.command {
        Commands::Query { template, params } => {
            let params = (!params.is_empty()).then_some(params.as_slice());
            let records = client.query(&template, params).await?;
            serde_json::Value::Array(records)
        }
        Commands::Rest {
            method,
            resource_type,
            id,
            body,
        } => {
            let mut request = RestActionRequest::new(method, resource_type);
            if let Some(id) = id {
                request = request.with_id(id);
            }
            if let Some(body) = body {
                let value = serde_json::from_str(&body).context("--body is not valid JSON")?;
                request = request.with_body(value);
            }
            match client.rest_action(request).await? {
                sfconn::RestResult::Success => serde_json::Value::String("Success".to_string()),
                sfconn::RestResult::Body(value) => value,
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
