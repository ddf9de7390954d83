// File: ./src/bin/tui.rs
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tickbox::tui::run().await
}
