#[tokio::main]
async fn main() {
    // `--deactivate` wipes the cached token and site, then exits.
    if std::env::args().skip(1).any(|arg| arg == "--deactivate") {
        comments_sync::deactivate().await;
        return;
    }

    comments_sync::run().await;
}
