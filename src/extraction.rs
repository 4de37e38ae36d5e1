use crate::{
    category::normalize,
    config::{AmountPolicy, LedgerConfig},
    transaction::Transaction,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, error, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::future::Future;
use thiserror::Error;

/// Shown to the rider whenever an upload could not be turned into transactions.
/// The underlying cause is logged rather than displayed.
pub const USER_MESSAGE: &str =
    "Failed to process transaction data. Please ensure the screenshot or text is clear.";

const PROMPT: &str = "Read this delivery rider's statement. It is either a screenshot of \
the rider app or a pasted text log. List every transaction with its date and time, its \
type, its amount in BDT and its transaction ID or reference.

Use only these types:
- 'Collection' for cash collected from a customer
- 'Delivery Charge' for the rider's earnings
- 'Payment' for money the rider paid to the company

Answer with a JSON array that follows the response schema.";

/// The statement a rider handed over for extraction
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatementInput {
    Text(String),
    Inline {
        /// Base64 encoded file contents
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

/// Everything an `ExtractionGateway` needs to send to the extraction service
#[derive(Clone, Debug, Serialize)]
pub struct ExtractionRequest {
    prompt: &'static str,
    input: StatementInput,
    schema: Value,
}

/// A transaction candidate as returned by the extraction service.
///
/// Nothing here is trusted yet. `normalize_batch` turns candidates into `Transaction`s.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RawTransaction {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    // Read from the JSON number text, so no digits are lost on the way in
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
}

/// The external service that reads statements.
///
/// Implementations send the request wherever they like and hand back the raw response
/// body, which must be a JSON array of transaction candidates. Dropping the returned
/// future abandons the request. The future must be `Send` so a multi-threaded host can
/// run it on another task.
pub trait ExtractionGateway {
    fn extract(
        &self,
        request: &ExtractionRequest,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[error("{0}")]
pub struct GatewayError(pub String);

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("extraction service failed: {0}")]
    Gateway(#[from] GatewayError),
    #[error("extraction response is not a list of transactions")]
    Malformed(#[from] serde_json::Error),
    #[error("transaction '{id}' has an implausible amount ({amount})")]
    AmountOutOfRange { id: String, amount: Decimal },
    #[error("transaction '{id}' has a negative amount ({amount})")]
    NegativeAmount { id: String, amount: Decimal },
    #[error("statement is not a base64 data URL")]
    InvalidDataUrl,
}

impl StatementInput {
    pub fn text<S: Into<String>>(text: S) -> Self {
        StatementInput::Text(text.into())
    }

    /// Wrap the raw bytes of an uploaded file, e.g. a PNG screenshot.
    pub fn from_bytes<S: Into<String>>(bytes: &[u8], mime_type: S) -> Self {
        StatementInput::Inline {
            data: STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` URL as produced by a browser file reader.
    pub fn from_data_url(url: &str) -> Result<Self, ExtractionError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or(ExtractionError::InvalidDataUrl)?;
        let comma = rest.find(',').ok_or(ExtractionError::InvalidDataUrl)?;
        let (header, payload) = (&rest[..comma], &rest[comma + 1..]);
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or(ExtractionError::InvalidDataUrl)?;

        if mime_type.is_empty() || STANDARD.decode(payload).is_err() {
            return Err(ExtractionError::InvalidDataUrl);
        }

        Ok(StatementInput::Inline {
            data: payload.to_owned(),
            mime_type: mime_type.to_owned(),
        })
    }
}

impl ExtractionRequest {
    pub fn new(input: StatementInput) -> Self {
        ExtractionRequest {
            prompt: PROMPT,
            input,
            schema: response_schema(),
        }
    }

    pub fn prompt(&self) -> &str {
        self.prompt
    }

    pub fn input(&self) -> &StatementInput {
        &self.input
    }

    /// JSON schema the response body must follow
    pub fn schema(&self) -> &Value {
        &self.schema
    }
}

impl ExtractionError {
    /// The single message shown to the rider for any extraction failure
    pub fn user_message(&self) -> &'static str {
        USER_MESSAGE
    }
}

fn response_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "date": { "type": "string", "description": "Date and time of transaction" },
                "type": { "type": "string", "description": "Collection, Delivery Charge, or Payment" },
                "id": { "type": "string", "description": "Transaction ID or Reference" },
                "amount": { "type": "number", "description": "Amount in BDT" }
            },
            "required": ["date", "type", "id", "amount"],
            "propertyOrdering": ["date", "type", "id", "amount"]
        }
    })
}

/// Parse an extraction response body into transaction candidates.
///
/// An empty body means the service found nothing, which is an empty batch rather than
/// an error.
pub fn parse_candidates(body: &str) -> Result<Vec<RawTransaction>, ExtractionError> {
    if body.trim().is_empty() {
        debug!("extraction response was empty");
        return Ok(Vec::new());
    }

    let candidates: Vec<RawTransaction> = serde_json::from_str(body)?;
    debug!("parsed {} transaction candidates", candidates.len());

    Ok(candidates)
}

/// Turn candidates into `Transaction`s.
///
/// This is all or nothing: if any candidate fails, no transactions are returned.
pub fn normalize_batch(
    candidates: Vec<RawTransaction>,
    config: &LedgerConfig,
) -> Result<Vec<Transaction>, ExtractionError> {
    candidates
        .into_iter()
        .map(|c| normalize_candidate(c, config.amount_policy(), config.max_amount()))
        .collect()
}

fn normalize_candidate(
    candidate: RawTransaction,
    policy: AmountPolicy,
    max_amount: Decimal,
) -> Result<Transaction, ExtractionError> {
    let RawTransaction {
        date,
        kind,
        id,
        mut amount,
    } = candidate;

    // Checked in both directions, since a pass-through negative is summed too
    if amount.abs() > max_amount {
        error!(
            "transaction '{}' amount {} is beyond the limit of {}",
            id, amount, max_amount
        );
        return Err(ExtractionError::AmountOutOfRange { id, amount });
    }

    if amount < Decimal::ZERO {
        match policy {
            AmountPolicy::PassThrough => {
                warn!("keeping negative amount {} for transaction '{}'", amount, id);
            }
            AmountPolicy::Clamp => {
                warn!("clamping negative amount {} for transaction '{}'", amount, id);
                amount = Decimal::ZERO;
            }
            AmountPolicy::Reject => {
                return Err(ExtractionError::NegativeAmount { id, amount });
            }
        }
    }

    Ok(Transaction::new(date, normalize(&kind), id, amount))
}

/// Ask the gateway to read a statement and return the normalized batch.
///
/// Neither store is touched here. The caller appends the batch once it arrives.
pub async fn extract<G>(
    gateway: &G,
    input: StatementInput,
    config: &LedgerConfig,
) -> Result<Vec<Transaction>, ExtractionError>
where
    G: ExtractionGateway + Sync,
{
    let request = ExtractionRequest::new(input);

    let result = match gateway.extract(&request).await {
        Ok(body) => parse_candidates(&body).and_then(|c| normalize_batch(c, config)),
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(batch) => {
            debug!("extracted {} transactions", batch.len());
            Ok(batch)
        }
        Err(e) => {
            error!("extraction failed: {}", e);
            Err(e)
        }
    }
}
