// Path: crates/types/src/error/mod.rs
//! Core error types for the Meridian kernel.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors raised by the binary codec and its JSON mapping.
///
/// The `Display` strings of the wire-format variants are part of the external
/// contract and must not change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A varint does not fit the target integer width.
    #[error("Value out of range of {0}")]
    OutOfRange(&'static str),
    /// The buffer ended before a value could be read, or a packed array was
    /// present with zero length.
    #[error("Invalid buffer length")]
    InvalidBufferLength,
    /// A varint carried a redundant trailing zero byte.
    #[error("Invalid varint: no zero byte allowed at the end")]
    NonCanonicalVarint,
    /// A key referenced an unknown field or broke the ascending field order.
    #[error("Invalid field number while decoding")]
    InvalidFieldNumber,
    /// A key carried a wire type that does not match the schema.
    #[error("Invalid wiretype while decoding.")]
    InvalidWireType,
    /// A required non-array field was absent when the buffer ended.
    #[error("Message does not contain a property for fieldNumber: {0}.")]
    MissingField(u32),
    /// Bytes remained after the last recognised pair.
    #[error("Invalid terminate index.")]
    InvalidTerminateIndex,
    /// A boolean value was neither `0x00` nor `0x01`.
    #[error("Invalid boolean bytes.")]
    InvalidBoolean,
    /// A string value was not valid UTF-8.
    #[error("Invalid UTF-8 string")]
    InvalidUtf8,
    /// A required property was missing from the value being encoded.
    #[error("Missing required property: {0}")]
    MissingProperty(String),
    /// A value contained a property the schema does not declare.
    #[error("Unknown property: {0}")]
    UnknownProperty(String),
    /// A property held a value of the wrong type.
    #[error("Property '{name}' must be of type {expected}")]
    TypeMismatch {
        /// The property name.
        name: String,
        /// The expected data type.
        expected: &'static str,
    },
    /// A property violated its declared length bounds.
    #[error("Property '{name}' has length {length} outside of [{min}, {max}]")]
    LengthBounds {
        /// The property name.
        name: String,
        /// The observed length.
        length: usize,
        /// The inclusive lower bound.
        min: usize,
        /// The inclusive upper bound.
        max: usize,
    },
    /// A JSON representation could not be mapped to the schema.
    #[error("Invalid JSON for property '{name}': {reason}")]
    Json {
        /// The property name.
        name: String,
        /// What went wrong.
        reason: String,
    },
}

impl ErrorCode for CodecError {
    fn code(&self) -> &'static str {
        match self {
            Self::OutOfRange(_) => "CODEC_OUT_OF_RANGE",
            Self::InvalidBufferLength => "CODEC_INVALID_BUFFER_LENGTH",
            Self::NonCanonicalVarint => "CODEC_NON_CANONICAL_VARINT",
            Self::InvalidFieldNumber => "CODEC_INVALID_FIELD_NUMBER",
            Self::InvalidWireType => "CODEC_INVALID_WIRE_TYPE",
            Self::MissingField(_) => "CODEC_MISSING_FIELD",
            Self::InvalidTerminateIndex => "CODEC_INVALID_TERMINATE_INDEX",
            Self::InvalidBoolean => "CODEC_INVALID_BOOLEAN",
            Self::InvalidUtf8 => "CODEC_INVALID_UTF8",
            Self::MissingProperty(_) => "CODEC_MISSING_PROPERTY",
            Self::UnknownProperty(_) => "CODEC_UNKNOWN_PROPERTY",
            Self::TypeMismatch { .. } => "CODEC_TYPE_MISMATCH",
            Self::LengthBounds { .. } => "CODEC_LENGTH_BOUNDS",
            Self::Json { .. } => "CODEC_INVALID_JSON",
        }
    }
}

/// Errors raised while compiling a schema description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two properties share a field number.
    #[error("Duplicate field number {0} in schema '{1}'")]
    DuplicateFieldNumber(u32, String),
    /// Two properties share a name.
    #[error("Duplicate property name '{0}' in schema '{1}'")]
    DuplicateName(String, String),
    /// A field number is zero or too large to be packed into a key.
    #[error("Invalid field number {0} for property '{1}'")]
    InvalidFieldNumber(u32, String),
    /// The description is structurally malformed.
    #[error("Malformed schema: {0}")]
    Malformed(String),
}

impl ErrorCode for SchemaError {
    fn code(&self) -> &'static str {
        match self {
            Self::DuplicateFieldNumber(..) => "SCHEMA_DUPLICATE_FIELD_NUMBER",
            Self::DuplicateName(..) => "SCHEMA_DUPLICATE_NAME",
            Self::InvalidFieldNumber(..) => "SCHEMA_INVALID_FIELD_NUMBER",
            Self::Malformed(_) => "SCHEMA_MALFORMED",
        }
    }
}

/// Errors related to the key-value state and the typed stores on top of it.
#[derive(Error, Debug, PartialEq)]
pub enum StateError {
    /// The requested key was not found in the state.
    #[error("Key not found in state: {0}")]
    NotFound(String),
    /// A stored value could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] CodecError),
    /// A snapshot marker does not belong to the current journal.
    #[error("Invalid snapshot id {0}")]
    InvalidSnapshot(usize),
    /// An error occurred in the state backend.
    #[error("State backend error: {0}")]
    Backend(String),
}

impl StateError {
    /// Returns `true` for the `NotFound` variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "STATE_KEY_NOT_FOUND",
            Self::Decode(_) => "STATE_DECODE_ERROR",
            Self::InvalidSnapshot(_) => "STATE_INVALID_SNAPSHOT",
            Self::Backend(_) => "STATE_BACKEND_ERROR",
        }
    }
}

/// Errors related to Merkle proof handling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// A hash or key had an unexpected length.
    #[error("Invalid hash length: expected {expected}, got {got}")]
    InvalidHashLength {
        /// The expected length in bytes.
        expected: usize,
        /// The observed length in bytes.
        got: usize,
    },
    /// The proof is structurally malformed.
    #[error("Malformed proof: {0}")]
    Malformed(String),
}

impl ErrorCode for ProofError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidHashLength { .. } => "PROOF_INVALID_HASH_LENGTH",
            Self::Malformed(_) => "PROOF_MALFORMED",
        }
    }
}

/// Errors raised by cryptographic primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// A public or secret key could not be parsed or generated.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    /// A signature could not be parsed or aggregated.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    /// The aggregation bitmap does not match the key list.
    #[error("Invalid aggregation bits: expected {expected} bytes, got {got}")]
    InvalidAggregationBits {
        /// The expected bitmap length.
        expected: usize,
        /// The observed bitmap length.
        got: usize,
    },
    /// Key and weight lists differ in length.
    #[error("Key list has {keys} entries but weight list has {weights}")]
    WeightMismatch {
        /// Number of keys.
        keys: usize,
        /// Number of weights.
        weights: usize,
    },
}

impl ErrorCode for CryptoError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidKey(_) => "CRYPTO_INVALID_KEY",
            Self::InvalidSignature(_) => "CRYPTO_INVALID_SIGNATURE",
            Self::InvalidAggregationBits { .. } => "CRYPTO_INVALID_AGGREGATION_BITS",
            Self::WeightMismatch { .. } => "CRYPTO_WEIGHT_MISMATCH",
        }
    }
}

/// Errors raised by BFT vote tracking and the BFT parameters store.
#[derive(Error, Debug)]
pub enum BftError {
    /// An error occurred while accessing the state.
    #[error("State access error: {0}")]
    State(#[from] StateError),
    /// An error occurred while encoding or decoding a BFT record.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    /// A block generator is missing from the BFT parameters of its height.
    #[error("Validator {address} not found in BFT parameters for height {height}")]
    ValidatorNotFound {
        /// Hex encoded validator address.
        address: String,
        /// The height whose parameters were consulted.
        height: u32,
    },
    /// A block header does not extend the tracked window.
    #[error("Invalid block height: expected above {expected}, got {got}")]
    InvalidHeight {
        /// The newest tracked height.
        expected: u32,
        /// The height of the received header.
        got: u32,
    },
}

impl ErrorCode for BftError {
    fn code(&self) -> &'static str {
        match self {
            Self::State(_) => "BFT_STATE_ERROR",
            Self::Codec(_) => "BFT_CODEC_ERROR",
            Self::ValidatorNotFound { .. } => "BFT_VALIDATOR_NOT_FOUND",
            Self::InvalidHeight { .. } => "BFT_INVALID_HEIGHT",
        }
    }
}

/// Errors raised by the interoperability module.
#[derive(Error, Debug)]
pub enum InteropError {
    /// A protocol rule was violated by the submitted data. Commands report this
    /// variant as a failed verification instead of aborting.
    #[error("{0}")]
    Verification(String),
    /// A module hook or cross-chain command rejected a message.
    #[error("Hook failed: {0}")]
    Hook(String),
    /// An error occurred while accessing the state.
    #[error("State access error: {0}")]
    State(#[from] StateError),
    /// An error occurred in the codec.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    /// A cryptographic primitive failed.
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
    /// A Merkle proof was malformed.
    #[error("Proof error: {0}")]
    Proof(#[from] ProofError),
}

impl InteropError {
    /// Builds a `Verification` error from anything printable.
    pub fn verification(message: impl Into<String>) -> Self {
        Self::Verification(message.into())
    }
}

impl ErrorCode for InteropError {
    fn code(&self) -> &'static str {
        match self {
            Self::Verification(_) => "INTEROP_VERIFICATION_FAILED",
            Self::Hook(_) => "INTEROP_HOOK_FAILED",
            Self::State(_) => "INTEROP_STATE_ERROR",
            Self::Codec(_) => "INTEROP_CODEC_ERROR",
            Self::Crypto(_) => "INTEROP_CRYPTO_ERROR",
            Self::Proof(_) => "INTEROP_PROOF_ERROR",
        }
    }
}
