#![allow(dead_code)]

use std::time::Duration;

use gqlclient::{GraphQlClient, OutcomeKind, record};
use serde::Serialize;

const COUNTRY_QUERY: &str = r"
query Country($code: ID!) {
  country(code: $code) {
    code
    name
    capital
    languages { code name }
  }
}
";

#[derive(Debug, Default)]
struct CountryData {
    country: Option<Country>,
}

record!(CountryData { country });

#[derive(Debug, Default)]
struct Country {
    code: String,
    name: String,
    capital: Option<String>,
    languages: Vec<Language>,
}

record!(Country {
    code,
    name,
    capital,
    languages,
});

#[derive(Debug, Default)]
struct Language {
    code: String,
    name: String,
}

record!(Language { code, name });

#[derive(Debug, Serialize)]
struct CountryVariables<'a> {
    code: &'a str,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().pretty().init();

    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:4000/graphql".to_string());

    let client = GraphQlClient::builder()
        .with_endpoint(endpoint)?
        .with_timeout(Duration::from_secs(5))
        .build()?;

    // Unpack into a record
    let mut data = CountryData::default();
    let outcome = client
        .send(&mut data, COUNTRY_QUERY, &CountryVariables { code: "FR" })
        .await?;

    match outcome.kind() {
        OutcomeKind::Complete => println!("{:#?}", data.country),
        OutcomeKind::ServerErrors => {
            println!("partial result {:#?}", data.country);
            for error in outcome.errors() {
                eprintln!("server error: {error}");
            }
        }
        OutcomeKind::UnpackFailed | OutcomeKind::ServerErrorsAndUnpackFailed => {
            eprintln!("unexpected data: {:?}", outcome.unpack_error());
        }
    }

    // Raw response
    let response = client
        .operation("{ countries { code } }")
        .with_timeout(Duration::from_secs(2))
        .await?;
    println!("{:?}", response.data);

    Ok(())
}
