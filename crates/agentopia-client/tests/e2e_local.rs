//! End-to-end test against a local Agentopia stack.
//!
//! Expects the API on :8889, an anvil node on :8545 with the micropayment
//! contracts deployed, and the hello-world service on :8890. Tests the full flow:
//!   1. Read the starting balance
//!   2. Register (or look up) the hello-world service
//!   3. Call it through the proxy and check exactly one unit was charged
//!   4. Repeat with an API key issued by the same account
//!
//! Run:  cargo test -p agentopia-client --test e2e_local -- --nocapture --ignored

use agentopia_client::{
    Agentopia, AgentopiaError, ChainConfig, ClientConfig, Credentials, NewService,
    RequestOptions, UsdcAmount,
};

const SLUG: &str = "hello-world-service";
const SERVICE_URL: &str = "http://localhost:8890/hello-world-service";

fn api_url() -> String {
    std::env::var("AGENTOPIA_API_URL").unwrap_or_else(|_| "http://localhost:8889".to_string())
}

fn local_chain() -> ChainConfig {
    ChainConfig {
        chain_id: 31337,
        rpc_url: "http://localhost:8545".to_string(),
        usdc_address: "0x8d63C7203d88c95c30C68283c34F743e061c2a31".parse().unwrap(),
        micropayment_address: Some("0xF461d09EB295f1538a6fec92072eB2F3578e121a".parse().unwrap()),
    }
}

fn owner() -> Agentopia {
    dotenvy::dotenv().ok();
    // Hardhat account #4 unless overridden
    let key = std::env::var("AGENTOPIA_PRIVATE_KEY").unwrap_or_else(|_| {
        "0x47e179ec197488593b187f80a00eb0da91f1b9d0b13f8733639f19c30a34926a".to_string()
    });
    let creds = Credentials::from_private_key(&key).expect("invalid AGENTOPIA_PRIVATE_KEY");
    Agentopia::new(ClientConfig::new(creds).api_url(api_url()).chain(local_chain()))
        .expect("client")
}

async fn ensure_service(client: &Agentopia) {
    match client.service().get_by_slug(SLUG).await {
        Ok(service) => println!("        Found service {}", service.id),
        Err(AgentopiaError::NotFound(_)) => {
            let schema: serde_json::Value = reqwest::get(format!("{SERVICE_URL}/openapi.json"))
                .await
                .expect("fetch openapi.json")
                .json()
                .await
                .expect("parse openapi.json");
            let new = NewService::new(
                "Hello World Service",
                "A simple service to demonstrate the Agentopia.xyz platform",
                SERVICE_URL,
                SLUG,
                UsdcAmount::from_units(10),
                3600,
            )
            .api_schema(schema.clone());
            let service = client.service().register(&new).await.expect("register");
            assert_eq!(service.api_schema.as_ref(), Some(&schema));
            println!("        Registered service {}", service.id);
        }
        Err(e) => panic!("lookup failed: {e}"),
    }
}

#[tokio::test]
#[ignore]
async fn e2e_proxy_execution_charges_one_unit() {
    let client = owner();
    println!("\n=== Agentopia proxy E2E ===");
    println!("API:    {}", api_url());
    println!("Wallet: {:?}\n", client.address());

    println!("Step 1: read balance");
    let initial = client.get_balance().await.expect("balance").available_balance;
    println!("        Available: {} USDC", initial.to_usdc_string());

    println!("Step 2: register or look up {SLUG}");
    ensure_service(&client).await;

    println!("Step 3: execute via proxy");
    let reply = client
        .service()
        .execute_via_proxy(SLUG, "hello_world", "GET", RequestOptions::new())
        .await
        .expect("execute");
    assert_eq!(reply["message"], "Hello from Agentopia!");

    let after = client.get_balance().await.expect("balance").available_balance;
    assert_eq!(after.checked_add(UsdcAmount::from_units(1)), Some(initial));
    println!("        Charged 1 unit, now {} USDC", after.to_usdc_string());
}

#[tokio::test]
#[ignore]
async fn e2e_proxy_execution_with_api_key() {
    let client = owner();
    ensure_service(&client).await;

    let key = client.api_key().create("e2e-api-key").await.expect("api key");
    let initial = client.get_balance().await.expect("balance").available_balance;

    let delegate = Agentopia::new(
        ClientConfig::new(Credentials::from_api_key(key.key)).api_url(api_url()),
    )
    .expect("client");
    let reply = delegate
        .service()
        .execute_via_proxy(SLUG, "hello_world", "GET", RequestOptions::new())
        .await
        .expect("execute");
    assert_eq!(reply["message"], "Hello from Agentopia!");

    let after = client.get_balance().await.expect("balance").available_balance;
    assert_eq!(after.checked_add(UsdcAmount::from_units(1)), Some(initial));
}

#[tokio::test]
#[ignore]
async fn e2e_direct_execution() {
    let client = owner();
    ensure_service(&client).await;

    let reply = client
        .service()
        .execute(SLUG, "hello_world", "GET", RequestOptions::new())
        .await
        .expect("execute");
    assert_eq!(reply["message"], "Hello from Agentopia!");
}
