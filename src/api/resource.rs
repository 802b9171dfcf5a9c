use std::fmt::Display;
use std::time::Duration;

use reqwest::{header, Client, Method};
use serde_json::{Map, Value};
use tracing::debug;

use super::error::TeslaApiError;

/// The upstream API refuses requests without a browser-looking user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10; Pixel 3 Build/QQ2A.200305.002; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/85.0.4183.81 Mobile Safari/537.36";

/// The mobile app identifier the API additionally expects.
const X_TESLA_USER_AGENT: &str = "TeslaApp/3.10.9-433/adff2e065/android/10";

/// Keyword parameters for an invocation, keyed by parameter name.
///
/// A key may carry one trailing underscore to escape a name that would
/// otherwise collide with a reserved word; it is stripped before
/// transmission (`type_` is sent as `type`).
pub type Params = Map<String, Value>;

/// A lazily-built reference to one URL within the owner API.
///
/// `child` and `at` only accumulate path segments; nothing touches the
/// network until [`Resource::invoke`] (or one of its wrappers) runs.
#[derive(Debug, Clone)]
pub struct Resource {
    url: String,
    access_token: String,
    timeout: Duration,
    client: Client,
}

impl Resource {
    /// Creates a new reference around the given base URL and bearer token.
    ///
    /// The URL is taken as-is; it is not validated in any way.
    pub fn new(
        url: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            url: url.into(),
            access_token: access_token.into(),
            timeout,
            client: Client::new(),
        }
    }

    /// The URL accumulated so far.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns a new reference with `segment` appended to the path.
    pub fn child(&self, segment: impl Display) -> Resource {
        Resource {
            url: format!("{}/{}", self.url, segment),
            access_token: self.access_token.clone(),
            timeout: self.timeout,
            client: self.client.clone(),
        }
    }

    /// Returns a new reference with an index appended to the path.
    ///
    /// Identical to [`Resource::child`]; reads better for numeric
    /// identifiers such as vehicle IDs and energy site IDs.
    pub fn at(&self, index: impl Display) -> Resource {
        self.child(index)
    }

    /// Executes a GET request against this URL with no parameters.
    pub async fn get(&self) -> Result<Value, TeslaApiError> {
        self.invoke(&[], Params::new(), None).await
    }

    /// Executes a request with the given parameters, inferring the method:
    /// GET when `params` is empty, POST otherwise.
    pub async fn call(&self, params: Params) -> Result<Value, TeslaApiError> {
        self.invoke(&[], params, None).await
    }

    /// Executes a POST request regardless of parameter count.
    ///
    /// Needed for command endpoints like `wake_up` that take no body.
    pub async fn post(&self, params: Params) -> Result<Value, TeslaApiError> {
        self.invoke(&[], params, Some(Method::POST)).await
    }

    /// Executes a request against this URL.
    ///
    /// Each positional `arg` is appended as a further path segment. The
    /// method is `method` when given, and otherwise inferred from
    /// `params` (GET when empty, POST when not). Parameter keys have one
    /// trailing underscore stripped, then travel as query parameters on
    /// GET and as the JSON body on POST.
    ///
    /// On success, returns the value under the body's `response` key.
    pub async fn invoke(
        &self,
        args: &[&dyn Display],
        params: Params,
        method: Option<Method>,
    ) -> Result<Value, TeslaApiError> {
        let mut url = self.url.clone();
        for arg in args {
            url.push('/');
            url.push_str(&arg.to_string());
        }

        let method = infer_method(method, &params);
        let params = normalize_params(params);
        let bearer = format!("Bearer {}", self.access_token);

        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(header::AUTHORIZATION, bearer.as_str())
            .header(header::USER_AGENT, USER_AGENT)
            .header("x-tesla-user-agent", X_TESLA_USER_AGENT)
            .timeout(self.timeout);

        if method == Method::POST {
            // The upstream additionally expects the bearer token as a
            // query parameter on POST.
            request = request
                .query(&[("Authorization", bearer.as_str())])
                .json(&Value::Object(params));
        } else if !params.is_empty() {
            let pairs: Vec<(&str, String)> = params
                .iter()
                .map(|(key, value)| (key.as_str(), query_string(value)))
                .collect();
            request = request.query(&pairs);
        }

        let response = request
            .send()
            .await
            .map_err(|err| TeslaApiError::transport(&url, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TeslaApiError::ApiStatus {
                status: status.as_u16(),
                url,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|err| TeslaApiError::transport(&url, err))?;
        let body: Value = serde_json::from_str(&text)?;

        // A list body signals per-item failures; collect every description.
        if let Value::Array(items) = &body {
            let errors: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("error"))
                .filter_map(|error| error.get("description"))
                .filter_map(Value::as_str)
                .collect();
            if !errors.is_empty() {
                return Err(TeslaApiError::ApiSemantic(errors.join("\n")));
            }
        }

        // The payload we want always sits under the `response` key.
        match body {
            Value::Object(mut object) => object
                .remove("response")
                .ok_or(TeslaApiError::MalformedResponse { url }),
            _ => Err(TeslaApiError::MalformedResponse { url }),
        }
    }
}

/// An explicit method always wins; otherwise parameters imply POST.
fn infer_method(explicit: Option<Method>, params: &Params) -> Method {
    match explicit {
        Some(method) => method,
        None if params.is_empty() => Method::GET,
        None => Method::POST,
    }
}

/// Strips exactly one trailing underscore from each parameter key.
fn normalize_params(params: Params) -> Params {
    params
        .into_iter()
        .map(|(key, value)| {
            let key = match key.strip_suffix('_') {
                Some(stripped) => stripped.to_string(),
                None => key,
            };
            (key, value)
        })
        .collect()
}

/// Renders a JSON value as a query parameter, unquoting plain strings.
fn query_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn root() -> Resource {
        Resource::new(
            "https://owner-api.example/api/1",
            "token",
            Duration::from_secs(30),
        )
    }

    #[test]
    fn child_accesses_accumulate_path_segments() {
        let charge_state = root()
            .child("vehicles")
            .at(42)
            .child("data_request")
            .child("charge_state");
        assert_eq!(
            charge_state.url(),
            "https://owner-api.example/api/1/vehicles/42/data_request/charge_state"
        );
        // The root is untouched by traversal.
        assert_eq!(root().url(), "https://owner-api.example/api/1");
    }

    #[test]
    fn method_is_inferred_from_parameters() {
        let mut params = Params::new();
        assert_eq!(infer_method(None, &params), Method::GET);

        params.insert("on".to_string(), json!(true));
        assert_eq!(infer_method(None, &params), Method::POST);

        // An explicit override wins regardless of parameter count.
        assert_eq!(infer_method(Some(Method::POST), &Params::new()), Method::POST);
        assert_eq!(infer_method(Some(Method::GET), &params), Method::GET);
    }

    #[test]
    fn one_trailing_underscore_is_stripped_from_keys() {
        let mut params = Params::new();
        params.insert("type_".to_string(), json!("wall"));
        params.insert("count".to_string(), json!(3));
        params.insert("odd__".to_string(), json!(1));

        let normalized = normalize_params(params);
        assert!(normalized.contains_key("type"));
        assert!(normalized.contains_key("count"));
        // Only one underscore comes off.
        assert!(normalized.contains_key("odd_"));
    }

    #[test]
    fn query_strings_are_unquoted() {
        assert_eq!(query_string(&json!("backup")), "backup");
        assert_eq!(query_string(&json!(42)), "42");
        assert_eq!(query_string(&json!(true)), "true");
    }
}
