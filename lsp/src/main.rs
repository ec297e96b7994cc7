#[tokio::main]
async fn main() {
    slim_lsp::run().await;
}
