use super::types::{ApiResponse, HealthBody, HealthStatus, PromptPayload};
use crate::config::Config;
use crate::error::{AppError, Result};
use prompt_meta_common::PromptEntry;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// 1リクエストで取得する件数
pub const PAGE_SIZE: usize = 500;

/// プロンプトストアのクライアント（読み取り専用）
#[derive(Debug, Clone)]
pub struct PromptStoreClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl PromptStoreClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("prompt-meta/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.get_api_url()?,
            config.get_api_token(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let url = self.endpoint(path);
        log::debug!("GET {}", url);
        let request = self.http.get(url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// ヘルスチェック
    ///
    /// 失敗してもエラーにはせず、到達不可として返す。
    pub async fn health(&self) -> HealthStatus {
        let response = match self.get("health").send().await {
            Ok(r) => r,
            Err(e) => return HealthStatus::unreachable(e.to_string()),
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => parse_health(status, &body),
            Err(e) => HealthStatus::unreachable(e.to_string()),
        }
    }

    /// カタログ全件を取得する
    ///
    /// `total` が返る場合はページを順に取得する。返らない場合は1ページ目が全件。
    pub async fn list_prompts(&self) -> Result<Vec<PromptEntry>> {
        let mut all = Vec::new();
        let mut offset = 0usize;

        loop {
            let response = self
                .get("prompts")
                .query(&[("limit", PAGE_SIZE), ("offset", offset)])
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;

            let payload: PromptPayload = decode_envelope(status, &body)?;
            let (prompts, total) = payload.into_parts();
            let count = prompts.len();
            all.extend(prompts);

            match total {
                Some(total) if count > 0 && all.len() < total => offset += count,
                _ => break,
            }
        }

        Ok(all)
    }

    /// 予定回数に達していないプロンプト
    pub async fn list_pending(&self, limit: Option<usize>) -> Result<Vec<PromptEntry>> {
        let mut request = self.get("prompts/pending");
        if let Some(limit) = limit.filter(|&n| n > 0) {
            request = request.query(&[("limit", limit)]);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let payload: PromptPayload = decode_envelope(status, &body)?;
        Ok(payload.into_parts().0)
    }
}

/// `{ success, data, error, message }` を展開する
pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
    let ok_status = (200..300).contains(&status);

    let envelope: ApiResponse<T> = serde_json::from_str(body).map_err(|e| {
        if ok_status {
            AppError::Api(format!("Ungültige Antwort: {}", e))
        } else {
            AppError::Api(format!("HTTP {}", status))
        }
    })?;

    if !ok_status || !envelope.success {
        let reason = envelope
            .error
            .or(envelope.message)
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(AppError::Api(reason));
    }

    envelope
        .data
        .ok_or_else(|| AppError::Api("Antwort ohne Daten".into()))
}

/// `/health` のレスポンスを解釈する
pub fn parse_health(status: u16, body: &str) -> HealthStatus {
    if !(200..300).contains(&status) {
        return HealthStatus::unreachable(format!("HTTP {}", status));
    }

    match serde_json::from_str::<HealthBody>(body) {
        Ok(health) => HealthStatus {
            reachable: health.success,
            message: health.message.unwrap_or_default(),
            database: health.database,
        },
        Err(e) => HealthStatus::unreachable(format!("Ungültige Antwort: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client(url: &str) -> PromptStoreClient {
        PromptStoreClient::new(url, None, Duration::from_secs(1)).unwrap()
    }

    type Requests = Arc<Mutex<Vec<String>>>;

    /// ローカルのストア代替。リクエスト行のパス（クエリ付き）を受け取り、本文を返す
    async fn serve<F>(respond: F) -> (String, Requests)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: Requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let raw = String::from_utf8_lossy(&buf[..n]).to_string();
                let target = raw.split_whitespace().nth(1).unwrap_or("/").to_string();
                seen.lock().unwrap().push(raw);

                let body = respond(&target);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), requests)
    }

    fn query_param(target: &str, key: &str) -> Option<usize> {
        let (_, query) = target.split_once('?')?;
        query.split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            if k == key {
                v.parse().ok()
            } else {
                None
            }
        })
    }

    fn request_targets(requests: &Requests) -> Vec<String> {
        requests
            .lock()
            .unwrap()
            .iter()
            .map(|raw| raw.split_whitespace().nth(1).unwrap_or("").to_string())
            .collect()
    }

    fn ids(entries: &[PromptEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            client("https://store.test/api/").endpoint("prompts"),
            "https://store.test/api/prompts"
        );
        assert_eq!(
            client("https://store.test/api").endpoint("/health"),
            "https://store.test/api/health"
        );
    }

    #[test]
    fn test_decode_node_page() {
        let body = r#"{"success": true, "data": {"prompts": [{"id": 1, "prompt": "red fox"}], "total": 3}}"#;
        let payload: PromptPayload = decode_envelope(200, body).unwrap();
        let (prompts, total) = payload.into_parts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(total, Some(3));
    }

    #[test]
    fn test_decode_php_page() {
        let body = r#"{"success": true, "data": {"prompts": [{"id": "7", "prompt": "x", "expected_runs": "4"}]}}"#;
        let payload: PromptPayload = decode_envelope(200, body).unwrap();
        let (prompts, total) = payload.into_parts();
        assert_eq!(prompts[0].expected_runs, 4);
        assert_eq!(total, None);
    }

    #[test]
    fn test_decode_list_payload() {
        let body = r#"{"success": true, "data": [{"id": 1, "prompt": "a"}, {"id": 2, "prompt": "b"}]}"#;
        let payload: PromptPayload = decode_envelope(200, body).unwrap();
        assert_eq!(payload.into_parts().0.len(), 2);
    }

    #[test]
    fn test_decode_error_envelope() {
        let body = r#"{"success": false, "error": "Nicht autorisiert"}"#;
        let err = decode_envelope::<PromptPayload>(401, body).unwrap_err();
        assert!(matches!(err, AppError::Api(ref m) if m == "Nicht autorisiert"));

        let body = r#"{"success": false, "message": "Methode nicht erlaubt"}"#;
        let err = decode_envelope::<PromptPayload>(200, body).unwrap_err();
        assert!(matches!(err, AppError::Api(ref m) if m == "Methode nicht erlaubt"));
    }

    #[test]
    fn test_decode_non_json_error() {
        let err = decode_envelope::<PromptPayload>(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, AppError::Api(ref m) if m == "HTTP 502"));
    }

    #[test]
    fn test_decode_missing_data() {
        let err = decode_envelope::<PromptPayload>(200, r#"{"success": true}"#).unwrap_err();
        assert!(matches!(err, AppError::Api(_)));
    }

    #[test]
    fn test_parse_health() {
        let ok = parse_health(
            200,
            r#"{"success": true, "message": "API is running", "database": "connected"}"#,
        );
        assert!(ok.reachable);
        assert_eq!(ok.database.as_deref(), Some("connected"));

        let down = parse_health(200, r#"{"success": false}"#);
        assert!(!down.reachable);

        let error = parse_health(500, "");
        assert!(!error.reachable);
        assert_eq!(error.message, "HTTP 500");

        assert!(!parse_health(200, "not json").reachable);
    }

    #[tokio::test]
    async fn test_health_connection_refused() {
        let status = client("http://127.0.0.1:9").health().await;
        assert!(!status.reachable);
    }

    #[tokio::test]
    async fn test_list_prompts_follows_total() {
        // 1ページ1件、全3件
        let (url, requests) = serve(|target| {
            let offset = query_param(target, "offset").unwrap_or(0);
            format!(
                r#"{{"success": true, "data": {{"prompts": [{{"id": {}, "prompt": "p{}"}}], "total": 3}}}}"#,
                offset, offset
            )
        })
        .await;

        let entries = client(&url).list_prompts().await.unwrap();
        assert_eq!(ids(&entries), vec!["0", "1", "2"]);
        assert_eq!(
            request_targets(&requests),
            vec![
                "/prompts?limit=500&offset=0",
                "/prompts?limit=500&offset=1",
                "/prompts?limit=500&offset=2",
            ]
        );
    }

    #[tokio::test]
    async fn test_list_prompts_without_total_is_single_page() {
        let (url, requests) = serve(|_| {
            r#"{"success": true, "data": {"prompts": [{"id": "7", "prompt": "a"}, {"id": "8", "prompt": "b"}]}}"#
                .to_string()
        })
        .await;

        let entries = client(&url).list_prompts().await.unwrap();
        assert_eq!(ids(&entries), vec!["7", "8"]);
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_prompts_stops_on_empty_page() {
        // totalより少ない件数で空ページが返る
        let (url, requests) = serve(|target| {
            let offset = query_param(target, "offset").unwrap_or(0);
            if offset < 2 {
                format!(
                    r#"{{"success": true, "data": {{"prompts": [{{"id": {}, "prompt": "p"}}], "total": 5}}}}"#,
                    offset
                )
            } else {
                r#"{"success": true, "data": {"prompts": [], "total": 5}}"#.to_string()
            }
        })
        .await;

        let entries = client(&url).list_prompts().await.unwrap();
        assert_eq!(ids(&entries), vec!["0", "1"]);
        assert_eq!(requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_prompts_sends_bearer_token() {
        let (url, requests) =
            serve(|_| r#"{"success": true, "data": {"prompts": []}}"#.to_string()).await;

        let client =
            PromptStoreClient::new(&url, Some("geheim".into()), Duration::from_secs(1)).unwrap();
        assert!(client.list_prompts().await.unwrap().is_empty());

        let raw = requests.lock().unwrap()[0].to_lowercase();
        assert!(raw.contains("authorization: bearer geheim"));
    }

    #[tokio::test]
    async fn test_list_prompts_error_envelope() {
        let (url, _) =
            serve(|_| r#"{"success": false, "error": "Datenbankfehler"}"#.to_string()).await;

        let err = client(&url).list_prompts().await.unwrap_err();
        assert!(matches!(err, AppError::Api(ref m) if m == "Datenbankfehler"));
    }

    #[tokio::test]
    async fn test_list_pending_with_limit() {
        let (url, requests) = serve(|_| {
            r#"{"success": true, "data": [{"id": 2, "prompt": "b", "expected_runs": 3}, {"id": 5, "prompt": "e", "expected_runs": 1}]}"#
                .to_string()
        })
        .await;

        let entries = client(&url).list_pending(Some(2)).await.unwrap();
        assert_eq!(ids(&entries), vec!["2", "5"]);
        assert_eq!(request_targets(&requests), vec!["/prompts/pending?limit=2"]);
    }

    #[tokio::test]
    async fn test_list_pending_prompts_object_without_limit() {
        let (url, requests) = serve(|_| {
            r#"{"success": true, "data": {"prompts": [{"id": "9", "prompt": "x"}]}}"#.to_string()
        })
        .await;

        // 0は上限なし（クエリを付けない）
        let entries = client(&url).list_pending(Some(0)).await.unwrap();
        assert_eq!(ids(&entries), vec!["9"]);
        assert_eq!(request_targets(&requests), vec!["/prompts/pending"]);
    }
}
