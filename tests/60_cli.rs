mod common;

use anyhow::Result;

use gated_info_api::cli::commands::info;
use gated_info_api::cli::OutputFormat;

#[tokio::test]
async fn info_command_reads_a_running_service() -> Result<()> {
    let (_peer, addr) = common::spawn_peer("ch05-securing-applications").await?;

    info::handle(format!("http://{}", addr), OutputFormat::Json).await?;
    info::handle(format!("http://{}/", addr), OutputFormat::Text).await?;
    Ok(())
}

#[tokio::test]
async fn info_command_fails_when_nothing_listens() -> Result<()> {
    let (listener, addr) = common::bind().await?;
    drop(listener);

    let err = info::handle(format!("http://{}", addr), OutputFormat::Json)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("info lookup against"), "error: {err}");
    Ok(())
}
