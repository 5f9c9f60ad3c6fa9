use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

pub(crate) struct BaseClient {
    address: String,
    client: Client,
}

#[derive(Debug, PartialEq)]
pub enum APIErrorVariant {
    Network,
    MalformedResponse,
    BadClientData,
    NotFound,
    UnexpectedStatusCode(StatusCode),
}

#[derive(Debug)]
pub struct APIError {
    pub variant: APIErrorVariant,
    pub message: String,
}

impl APIError {
    fn new(variant: APIErrorVariant, message: impl Into<String>) -> Self {
        Self {
            variant,
            message: message.into(),
        }
    }
}

pub type APIResponse<T> = Result<T, APIError>;

impl BaseClient {
    pub fn new(address: String) -> Self {
        Self {
            address,
            client: Client::new(),
        }
    }

    fn get_client(&self, method: Method, path: String) -> RequestBuilder {
        let url = format!("{}/{}", self.address, path);
        self.client.request(method, &url)
    }

    async fn check_status_code(
        &self,
        res: Response,
        expected_status_code: StatusCode,
    ) -> Result<Response, APIError> {
        let status = res.status();
        if status == expected_status_code {
            return Ok(res);
        }

        let variant = match status {
            StatusCode::BAD_REQUEST => APIErrorVariant::BadClientData,
            StatusCode::NOT_FOUND => APIErrorVariant::NotFound,
            _ => APIErrorVariant::UnexpectedStatusCode(status),
        };
        let message = res.text().await.unwrap_or_default();
        Err(APIError::new(variant, message))
    }

    async fn handle_api_response<T: for<'de> Deserialize<'de>>(
        &self,
        res: Response,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self.check_status_code(res, expected_status_code).await?;
        res.json::<T>()
            .await
            .map_err(|e| APIError::new(APIErrorVariant::MalformedResponse, e.to_string()))
    }

    async fn send<T: for<'de> Deserialize<'de>>(
        &self,
        builder: RequestBuilder,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = builder
            .send()
            .await
            .map_err(|e| APIError::new(APIErrorVariant::Network, e.to_string()))?;
        self.handle_api_response(res, expected_status_code).await
    }

    pub async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        self.send(self.get_client(Method::GET, path), expected_status_code)
            .await
    }

    pub async fn post<T: for<'de> Deserialize<'de>, S: Serialize>(
        &self,
        body: S,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        self.send(
            self.get_client(Method::POST, path).json(&body),
            expected_status_code,
        )
        .await
    }
}
