use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use reqwest::{blocking::Client, header::CONTENT_TYPE, StatusCode, Url};
use sha2::Sha256;

use super::{ExportStorage, StorageError};

type HmacSha256 = Hmac<Sha256>;

const SAS_VERSION: &str = "2020-12-06";

/// Well-known account of the Azurite emulator
const DEV_ACCOUNT_NAME: &str = "devstoreaccount1";
const DEV_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const DEV_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

/// Lifetime of the write SAS used for the upload itself
const UPLOAD_SAS_MINUTES: i64 = 5;

/// Credentials and endpoint of a storage account
#[derive(Debug, Clone)]
pub struct StorageAccount {
    pub name: String,
    key: Vec<u8>,
    pub blob_endpoint: String,
}

impl StorageAccount {
    /// Parses an Azure storage connection string such as
    /// `DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=...;EndpointSuffix=core.windows.net`
    pub fn from_connection_string(connection_string: &str) -> Result<Self, StorageError> {
        let mut name = None;
        let mut key = None;
        let mut protocol = "https".to_string();
        let mut suffix = "core.windows.net".to_string();
        let mut blob_endpoint = None;

        for part in connection_string.split(';').map(str::trim) {
            if part.is_empty() {
                continue;
            }

            let (field, value) = part.split_once('=').ok_or_else(|| {
                StorageError::InvalidConnectionString(format!("`{}` is not a key=value pair", part))
            })?;

            match field.to_ascii_lowercase().as_str() {
                "usedevelopmentstorage" if value.eq_ignore_ascii_case("true") => {
                    name.get_or_insert_with(|| DEV_ACCOUNT_NAME.to_string());
                    key.get_or_insert_with(|| DEV_ACCOUNT_KEY.to_string());
                    blob_endpoint.get_or_insert_with(|| DEV_BLOB_ENDPOINT.to_string());
                }
                "accountname" => name = Some(value.to_string()),
                "accountkey" => key = Some(value.to_string()),
                "defaultendpointsprotocol" => protocol = value.to_string(),
                "endpointsuffix" => suffix = value.to_string(),
                "blobendpoint" => blob_endpoint = Some(value.to_string()),
                _ => {}
            }
        }

        let name = name.ok_or_else(|| {
            StorageError::InvalidConnectionString("AccountName is missing".to_string())
        })?;
        let key = key.ok_or_else(|| {
            StorageError::InvalidConnectionString("AccountKey is missing".to_string())
        })?;
        let key = STANDARD.decode(key).map_err(|e| {
            StorageError::InvalidConnectionString(format!("AccountKey is not base64: {}", e))
        })?;

        let blob_endpoint = blob_endpoint
            .unwrap_or_else(|| format!("{}://{}.blob.{}", protocol, name, suffix))
            .trim_end_matches('/')
            .to_string();

        Url::parse(&blob_endpoint).map_err(|e| {
            StorageError::InvalidConnectionString(format!("bad blob endpoint: {}", e))
        })?;

        Ok(Self {
            name,
            key,
            blob_endpoint,
        })
    }

    /// `spr` value, SAS tokens are restricted to https unless the endpoint is plain http
    fn protocol(&self) -> &'static str {
        if self.blob_endpoint.starts_with("https://") {
            "https"
        } else {
            ""
        }
    }

    fn sign(&self, string_to_sign: &str) -> Result<String, StorageError> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| StorageError::Signing(e.to_string()))?;
        mac.update(string_to_sign.as_bytes());

        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    fn url(&self, path: &str) -> Result<Url, StorageError> {
        Url::parse(&format!("{}/{}", self.blob_endpoint, path))
            .map_err(|e| StorageError::Signing(format!("bad object url: {}", e)))
    }

    /// URL of a single blob carrying a service SAS with `permissions`
    pub fn signed_blob_url(
        &self,
        container: &str,
        blob: &str,
        permissions: &str,
        expiry: DateTime<Utc>,
    ) -> Result<Url, StorageError> {
        let expiry = sas_time(expiry);
        let resource = format!("/blob/{}/{}/{}", self.name, container, blob);
        let protocol = self.protocol();
        let signature =
            self.sign(&blob_string_to_sign(permissions, &expiry, &resource, protocol))?;

        let mut url = self.url(&format!("{}/{}", container, blob))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("sv", SAS_VERSION)
                .append_pair("se", &expiry)
                .append_pair("sr", "b")
                .append_pair("sp", permissions);
            if !protocol.is_empty() {
                query.append_pair("spr", protocol);
            }
            query.append_pair("sig", &signature);
        }

        Ok(url)
    }

    /// Container URL with an account SAS granting container-level write, which covers Create Container
    pub fn container_create_url(
        &self,
        container: &str,
        expiry: DateTime<Utc>,
    ) -> Result<Url, StorageError> {
        let expiry = sas_time(expiry);
        let protocol = self.protocol();
        let signature =
            self.sign(&account_string_to_sign(&self.name, "w", "b", "c", &expiry, protocol))?;

        let mut url = self.url(container)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("restype", "container")
                .append_pair("sv", SAS_VERSION)
                .append_pair("ss", "b")
                .append_pair("srt", "c")
                .append_pair("sp", "w")
                .append_pair("se", &expiry);
            if !protocol.is_empty() {
                query.append_pair("spr", protocol);
            }
            query.append_pair("sig", &signature);
        }

        Ok(url)
    }
}

fn sas_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Service SAS for a blob, no start time, identifier, IP range or response overrides
fn blob_string_to_sign(permissions: &str, expiry: &str, resource: &str, protocol: &str) -> String {
    [
        permissions,
        "",
        expiry,
        resource,
        "",
        "",
        protocol,
        SAS_VERSION,
        "b",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
    ]
    .join("\n")
}

fn account_string_to_sign(
    account: &str,
    permissions: &str,
    services: &str,
    resource_types: &str,
    expiry: &str,
    protocol: &str,
) -> String {
    format!(
        "{}\n{}\n{}\n{}\n\n{}\n\n{}\n{}\n\n",
        account, permissions, services, resource_types, expiry, protocol, SAS_VERSION
    )
}

fn expect_status(
    operation: &'static str,
    status: StatusCode,
    accepted: &[StatusCode],
) -> Result<(), StorageError> {
    if accepted.contains(&status) {
        Ok(())
    } else {
        Err(StorageError::UnexpectedStatus { operation, status })
    }
}

/// Exports container in an Azure storage account
pub struct AzureBlobStorage {
    account: StorageAccount,
    container: String,
    url_ttl: Duration,
}

impl AzureBlobStorage {
    pub fn new(account: StorageAccount, container: String, url_ttl: Duration) -> Self {
        Self {
            account,
            container,
            url_ttl,
        }
    }

    pub fn from_connection_string(
        connection_string: &str,
        container: String,
        url_ttl: Duration,
    ) -> Result<Self, StorageError> {
        Ok(Self::new(
            StorageAccount::from_connection_string(connection_string)?,
            container,
            url_ttl,
        ))
    }

    pub fn account_name(&self) -> &str {
        &self.account.name
    }

    /// Creates the exports container, an existing one is left as is
    fn ensure_container(&self, client: &Client, now: DateTime<Utc>) -> Result<(), StorageError> {
        let url = self
            .account
            .container_create_url(&self.container, now + Duration::minutes(UPLOAD_SAS_MINUTES))?;

        let response = client.put(url).body(Vec::<u8>::new()).send()?;

        if response.status() == StatusCode::CREATED {
            log::info!("Created blob container {}", self.container);
        }

        expect_status(
            "create container",
            response.status(),
            &[StatusCode::CREATED, StatusCode::CONFLICT],
        )
    }
}

impl ExportStorage for AzureBlobStorage {
    fn upload(&self, name: &str, content: Vec<u8>) -> Result<String, StorageError> {
        let client = Client::new();
        let now = Utc::now();

        self.ensure_container(&client, now)?;

        let upload_url = self.account.signed_blob_url(
            &self.container,
            name,
            "cw",
            now + Duration::minutes(UPLOAD_SAS_MINUTES),
        )?;

        let response = client
            .put(upload_url)
            .header("x-ms-blob-type", "BlockBlob")
            .header(CONTENT_TYPE, "text/csv")
            .body(content)
            .send()?;

        expect_status("upload blob", response.status(), &[StatusCode::CREATED])?;

        log::debug!("Uploaded {}/{}", self.container, name);

        let expiry = now.checked_add_signed(self.url_ttl).ok_or_else(|| {
            StorageError::Signing(format!("download link lifetime {} is out of range", self.url_ttl))
        })?;
        let download_url = self
            .account
            .signed_blob_url(&self.container, name, "r", expiry)?;

        Ok(download_url.to_string())
    }
}
