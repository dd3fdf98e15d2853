//! Quick Start Example
//!
//! Submits a cycle of intents to a running Kula node, triggers a solver
//! pass, and follows it to settlement over the event stream.
//!
//! Start a node first: `cargo run --bin kula-node`

use kula_sdk::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Connect to a Kula node
    let client = KulaClient::connect("http://localhost:3000").await?;

    // 1. Declare a cycle of intents
    for (participant, wanted, offered) in [
        ("Nora", "a kayak", "a telescope"),
        ("Omar", "a telescope", "a violin"),
        ("Pia", "a violin", "a kayak"),
    ] {
        let receipt = client
            .submit_intent(IntentDraft::new(participant, wanted, offered))
            .await?;
        println!("📥 {} is in the pool (seq {})", participant, receipt.seq);
    }

    // 2. Subscribe before triggering, so nothing is missed
    let mut events = client.events().await?;

    let receipt = client.request_solve().await?;
    println!("🚀 Solver run {} started...", receipt.run_id);

    // 3. Follow the pass to completion
    while let Some(event) = events.next().await {
        match event {
            ExchangeEvent::SolveStarted {
                run_id,
                snapshot_len,
            } => {
                println!("⚙️  Run {} solving over {} intents", run_id, snapshot_len);
            }
            ExchangeEvent::SolveCompleted { report } => {
                for m in &report.matches {
                    println!("✅ {}", m.summary);
                }
                println!("📊 {} intents settled", report.removed);
                break;
            }
            ExchangeEvent::SolveFailed { message, .. } => {
                println!("❌ Solve failed: {}", message);
                break;
            }
            ExchangeEvent::IntentSubmitted { intent } => {
                println!("📥 Pool grew: {} wants {}", intent.participant, intent.wanted);
            }
        }
    }

    Ok(())
}
