#[tokio::main]
async fn main() {
    if let Err(err) = publiccommons_lib::run().await {
        eprintln!("publiccommons: {err}");
        std::process::exit(1);
    }
}
