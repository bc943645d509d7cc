//! Counter store walkthrough: declared actions, observers, async dispatch
//! and reset.

use anyhow::Result;
use futures::FutureExt;
use fusestate_core::api::{
    init_logging, load_default, ActionManifest, Record, StateContainer, Value,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = load_default()?;
    init_logging(&config.logging)?;

    let manifest = ActionManifest::new()
        .with_sync("increment", |s: &mut Record, step: f64| {
            let next = s.number("count").unwrap_or(0.0) + step;
            s.insert("count", next);
            Ok(())
        })
        .with_async("fetch", |s: &mut Record, step: f64| {
            async move {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                s.insert("count", step * 100.0);
                s.insert("source", "remote");
                Ok(())
            }
            .boxed_local()
        });

    let initial: Record = [("count", Value::from(0))].into_iter().collect();
    let mut store = StateContainer::with_config(&config, initial, manifest)?;

    store.register("printer", |new: &Record, old: &Record| {
        println!(
            "count {} -> {}",
            old.number("count").unwrap_or_default(),
            new.number("count").unwrap_or_default()
        );
        Ok(())
    });
    store.get_latest_state()?;

    for _ in 0..3 {
        store.dispatch("increment", 1.0)?;
    }

    store
        .dispatch_async("fetch", 4.0)
        .await?
        .dispatch_async("increment", 0.5)
        .await?;
    println!("source: {:?}", store.state().get("source"));

    store.clear_state()?;
    // fields added after construction survive a reset
    println!("after reset: {:?}", store.state());

    store.remove("printer");
    println!("notify cycles: {}", store.notify_cycles());

    Ok(())
}
