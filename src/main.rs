#[tokio::main]
async fn main() {
    if let Err(e) = openhome_sync::run().await {
        tracing::error!(error = %e, "openhome-sync stopped");
        eprintln!("openhome-sync: {e}");
        std::process::exit(1);
    }
}
