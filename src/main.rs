use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    modsync::run().await
}
