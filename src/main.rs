#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = sheet_grader::run().await {
        eprintln!("sheet-grader fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
