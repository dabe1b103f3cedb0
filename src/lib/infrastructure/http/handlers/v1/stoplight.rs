//! API documentation.

use axum::response::Html;

/// Stoplight API documentation.
pub async fn handler() -> Html<&'static str> {
    Html(
        r#"
<html lang="en">
<head>
    <title>EdgeMail API</title>
    <script src="https://unpkg.com/@stoplight/elements/web-components.min.js"></script>
    <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements/styles.min.css">
</head>
<body>
    <main role="main">
        <elements-api apiDescriptionUrl="/api/v1/openapi.json" router="hash" />
    </main>
</body>
</html>
"#,
    )
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use testresult::TestResult;

    use crate::infrastructure::http::{router, state::tests::test_state};

    #[tokio::test]
    async fn test_docs_handler() -> TestResult {
        let response = TestServer::new(router(test_state(None, None)))?
            .get("/api/v1")
            .await;

        response.assert_status_ok();

        let raw_text = response.text();

        assert!(raw_text.contains("EdgeMail API"));
        assert!(raw_text.contains("/api/v1/openapi.json"));

        Ok(())
    }

    #[tokio::test]
    async fn test_openapi_document() -> TestResult {
        let response = TestServer::new(router(test_state(None, None)))?
            .get("/api/v1/openapi.json")
            .await;

        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();

        for path in [
            "/api/v1/mail",
            "/api/v1/test-email",
            "/api/v1/status",
            "/api/v1/logs",
            "/api/v1/uptime",
        ] {
            assert!(json["paths"][path].is_object(), "{path} is documented");
        }

        Ok(())
    }
}
