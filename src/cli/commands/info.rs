use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::error::ApiError;

pub async fn handle(url: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = super::direct_client()?;

    match client.fetch_from(&url).await {
        Ok(info) => output_success(
            &output_format,
            &format!("{} is {:?}", info.service, info.status),
            Some(serde_json::to_value(&info)?),
        ),
        Err(e) => {
            let err = ApiError::from(e);
            output_error(&output_format, err.message(), Some(err.error_code()))?;
            anyhow::bail!("info lookup against {} failed", url)
        }
    }
}
