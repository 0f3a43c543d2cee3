// Path: crates/services/src/interoperability/events.rs
//! Events emitted by the interoperability module.

use meridian_api::events::EventQueue;
use meridian_types::app::{
    Ccm, CcmProcessedCode, CcmProcessedResult, ChainAccount, ChainId, TerminatedState,
};
use meridian_types::codec::{compile_static, Object, Schema, SchemaObject};
use meridian_types::error::CodecError;
use meridian_types::keys::MODULE_NAME_INTEROPERABILITY;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// A message was applied, forwarded, bounced or discarded.
pub const EVENT_NAME_CCM_PROCESSED: &str = "ccmProcessed";
/// A message was added to an outbox.
pub const EVENT_NAME_CCM_SEND_SUCCESS: &str = "ccmSendSuccess";
/// A chain account changed.
pub const EVENT_NAME_CHAIN_ACCOUNT_UPDATED: &str = "chainAccountUpdated";
/// A terminated state account was created.
pub const EVENT_NAME_TERMINATED_STATE_CREATED: &str = "terminatedStateCreated";

static CCM_PROCESSED_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/interoperability/events/ccmProcessed")
            .bytes("ccmID", 1)
            .uint32("result", 2)
            .uint32("code", 3),
    )
});

/// Payload of [`EVENT_NAME_CCM_PROCESSED`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CcmProcessedEventData {
    /// ID of the processed message.
    pub ccm_id: Vec<u8>,
    /// What happened to it.
    pub result: CcmProcessedResult,
    /// Why.
    pub code: CcmProcessedCode,
}

impl SchemaObject for CcmProcessedEventData {
    fn schema() -> &'static Schema {
        &CCM_PROCESSED_SCHEMA
    }

    fn to_object(&self) -> Object {
        Object::new()
            .with("ccmID", self.ccm_id.clone())
            .with("result", u32::from(self.result))
            .with("code", u32::from(self.code))
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            ccm_id: object.get_bytes("ccmID")?.to_vec(),
            result: CcmProcessedResult::try_from(object.get_u32("result")?)?,
            code: CcmProcessedCode::try_from(object.get_u32("code")?)?,
        })
    }
}

static CCM_SEND_SUCCESS_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(
        Schema::builder("/interoperability/events/ccmSendSuccess")
            .object("ccm", 1, Arc::new(Ccm::schema().clone())),
    )
});

/// Payload of [`EVENT_NAME_CCM_SEND_SUCCESS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CcmSendSuccessEventData {
    /// The sent message.
    pub ccm: Ccm,
}

impl SchemaObject for CcmSendSuccessEventData {
    fn schema() -> &'static Schema {
        &CCM_SEND_SUCCESS_SCHEMA
    }

    fn to_object(&self) -> Object {
        Object::new().with("ccm", self.ccm.to_object())
    }

    fn from_object(object: &Object) -> Result<Self, CodecError> {
        Ok(Self {
            ccm: Ccm::from_object(object.get_object("ccm")?)?,
        })
    }
}

/// Logs `ccmProcessed` with topics `[sending chain, receiving chain, ccm ID]`.
pub fn emit_ccm_processed(
    events: &mut EventQueue,
    sending_chain_id: &ChainId,
    receiving_chain_id: &ChainId,
    data: &CcmProcessedEventData,
) -> Result<(), CodecError> {
    tracing::debug!(
        target: "interop",
        ccm_id = %hex::encode(&data.ccm_id),
        result = ?data.result,
        code = ?data.code,
        "ccm processed"
    );
    events.add(
        MODULE_NAME_INTEROPERABILITY,
        EVENT_NAME_CCM_PROCESSED,
        data.encode()?,
        vec![
            sending_chain_id.as_bytes().to_vec(),
            receiving_chain_id.as_bytes().to_vec(),
            data.ccm_id.clone(),
        ],
    );
    Ok(())
}

/// Logs `ccmSendSuccess` with topics `[sending chain, receiving chain, ccm ID]`.
pub fn emit_ccm_send_success(
    events: &mut EventQueue,
    ccm_id: &[u8],
    ccm: &Ccm,
) -> Result<(), CodecError> {
    let data = CcmSendSuccessEventData { ccm: ccm.clone() };
    events.add(
        MODULE_NAME_INTEROPERABILITY,
        EVENT_NAME_CCM_SEND_SUCCESS,
        data.encode()?,
        vec![
            ccm.sending_chain_id.as_bytes().to_vec(),
            ccm.receiving_chain_id.as_bytes().to_vec(),
            ccm_id.to_vec(),
        ],
    );
    Ok(())
}

/// Logs `chainAccountUpdated` with the chain ID as topic.
pub fn emit_chain_account_updated(
    events: &mut EventQueue,
    chain_id: &ChainId,
    account: &ChainAccount,
) -> Result<(), CodecError> {
    events.add(
        MODULE_NAME_INTEROPERABILITY,
        EVENT_NAME_CHAIN_ACCOUNT_UPDATED,
        account.encode()?,
        vec![chain_id.as_bytes().to_vec()],
    );
    Ok(())
}

/// Logs `terminatedStateCreated` with the chain ID as topic.
pub fn emit_terminated_state_created(
    events: &mut EventQueue,
    chain_id: &ChainId,
    terminated: &TerminatedState,
) -> Result<(), CodecError> {
    events.add(
        MODULE_NAME_INTEROPERABILITY,
        EVENT_NAME_TERMINATED_STATE_CREATED,
        terminated.encode()?,
        vec![chain_id.as_bytes().to_vec()],
    );
    Ok(())
}
