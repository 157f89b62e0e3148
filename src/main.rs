// MediLens — Entry Point

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    medilens_lib::run().await
}
