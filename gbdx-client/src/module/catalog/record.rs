//! Single-record catalog lookup.

use super::types::CatalogRecord;
use crate::constants::{join_url, path_segment};
use crate::error::Result;
use crate::session::{self, HttpSession};

/// Fetches the catalog record for `cat_id`.
pub async fn get_catalog_record<S>(session: &S, cat_id: &str) -> Result<CatalogRecord>
where
    S: HttpSession + ?Sized,
{
    let url = join_url(session.base_url(), &["catalog", "v1", "record", &path_segment(cat_id)]);
    tracing::info!("Fetching catalog record {}", cat_id);
    let body = session.get_json(&url).await?;
    Ok(session::decode(&url, body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TEST_CAT_ID;
    use crate::error::{GbdxError, SessionError};
    use crate::testing::{MockSession, MOCK_BASE_URL};
    use serde_json::json;

    #[tokio::test]
    async fn test_get_catalog_record() {
        let session = MockSession::new();
        session.push_json(json!({
            "identifier": TEST_CAT_ID,
            "type": "DigitalGlobeAcquisition",
            "properties": {"sensorPlatformName": "WORLDVIEW02"}
        }));

        let record = get_catalog_record(&session, TEST_CAT_ID).await.unwrap();
        assert_eq!(record.identifier, TEST_CAT_ID);
        assert_eq!(record.properties["sensorPlatformName"], "WORLDVIEW02");
        assert_eq!(
            session.calls()[0].url,
            format!("{}/catalog/v1/record/{}", MOCK_BASE_URL, TEST_CAT_ID)
        );
    }

    #[tokio::test]
    async fn test_record_id_is_escaped() {
        let session = MockSession::new();
        session.push_json(json!({"identifier": "a/b?c"}));

        get_catalog_record(&session, "a/b?c").await.unwrap();
        assert_eq!(
            session.calls()[0].url,
            format!("{}/catalog/v1/record/a%2Fb%3Fc", MOCK_BASE_URL)
        );
    }

    #[tokio::test]
    async fn test_missing_record_is_status_error() {
        let session = MockSession::new();
        session.push_status(404);

        let err = get_catalog_record(&session, "nope").await.unwrap_err();
        assert!(matches!(
            err,
            GbdxError::Session(SessionError::Status { status: 404, .. })
        ));
    }
}
