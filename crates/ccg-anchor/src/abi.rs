// crates/ccg-anchor/src/abi.rs
//
// Solidity ABI bindings for the pointer contract:
//
//   getProject(bytes32)  view returns (bytes blob, bytes metadata, bool exists)
//   getMetaData(bytes32) view returns (bytes metadata, bool exists)
//   setProject(bytes32, bytes blob, bytes metadata)

use ethabi::{ParamType, Token};

use ccg_core::{CcgError, RepositoryId};

/// A contract function: name plus its input types.
#[derive(Debug, Clone, Copy)]
pub struct Function {
    pub name: &'static str,
    pub inputs: &'static [ParamType],
}

pub const GET_PROJECT: Function = Function {
    name: "getProject",
    inputs: &[ParamType::FixedBytes(32)],
};

pub const GET_METADATA: Function = Function {
    name: "getMetaData",
    inputs: &[ParamType::FixedBytes(32)],
};

pub const SET_PROJECT: Function = Function {
    name: "setProject",
    inputs: &[ParamType::FixedBytes(32), ParamType::Bytes, ParamType::Bytes],
};

const PROJECT_OUTPUTS: &[ParamType] = &[ParamType::Bytes, ParamType::Bytes, ParamType::Bool];
const METADATA_OUTPUTS: &[ParamType] = &[ParamType::Bytes, ParamType::Bool];

/// First four bytes of Keccak-256 over the canonical function signature.
pub fn selector(function: &Function) -> [u8; 4] {
    ethabi::short_signature(function.name, function.inputs)
}

fn calldata(function: &Function, args: &[Token]) -> Vec<u8> {
    let mut out = selector(function).to_vec();
    out.extend_from_slice(&ethabi::encode(args));
    out
}

/// Calldata for a getter taking a single `bytes32`.
pub fn encode_id_call(function: &Function, id: &RepositoryId) -> Vec<u8> {
    calldata(function, &[Token::FixedBytes(id.as_bytes().to_vec())])
}

/// Calldata for `setProject(bytes32,bytes,bytes)`.
pub fn encode_set_project(id: &RepositoryId, blob: &[u8], metadata: &[u8]) -> Vec<u8> {
    calldata(
        &SET_PROJECT,
        &[
            Token::FixedBytes(id.as_bytes().to_vec()),
            Token::Bytes(blob.to_vec()),
            Token::Bytes(metadata.to_vec()),
        ],
    )
}

fn decode_error(msg: impl Into<String>) -> CcgError {
    CcgError::Rpc(format!("undecodable return data: {}", msg.into()))
}

fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, CcgError> {
    ethabi::decode(types, data).map_err(|e| decode_error(e.to_string()))
}

fn take_bytes(token: Token) -> Result<Vec<u8>, CcgError> {
    match token {
        Token::Bytes(bytes) => Ok(bytes),
        other => Err(decode_error(format!("expected bytes, got {:?}", other))),
    }
}

fn take_bool(token: Token) -> Result<bool, CcgError> {
    token
        .into_bool()
        .ok_or_else(|| decode_error("expected bool"))
}

/// Decode the `(bytes, bytes, bool)` returned by `getProject`.
pub fn decode_project(data: &[u8]) -> Result<(Vec<u8>, Vec<u8>, bool), CcgError> {
    let mut tokens = decode(PROJECT_OUTPUTS, data)?.into_iter();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(blob), Some(metadata), Some(exists)) => {
            Ok((take_bytes(blob)?, take_bytes(metadata)?, take_bool(exists)?))
        }
        _ => Err(decode_error("getProject returned too few values")),
    }
}

/// Decode the `(bytes, bool)` returned by `getMetaData`.
pub fn decode_metadata(data: &[u8]) -> Result<(Vec<u8>, bool), CcgError> {
    let mut tokens = decode(METADATA_OUTPUTS, data)?.into_iter();
    match (tokens.next(), tokens.next()) {
        (Some(metadata), Some(exists)) => Ok((take_bytes(metadata)?, take_bool(exists)?)),
        _ => Err(decode_error("getMetaData returned too few values")),
    }
}

/// Return-data encoders, used by tests to play the contract's side.
#[cfg(test)]
pub(crate) mod returns {
    use super::*;

    pub fn project(blob: &[u8], metadata: &[u8], exists: bool) -> Vec<u8> {
        ethabi::encode(&[
            Token::Bytes(blob.to_vec()),
            Token::Bytes(metadata.to_vec()),
            Token::Bool(exists),
        ])
    }

    pub fn metadata(metadata: &[u8], exists: bool) -> Vec<u8> {
        ethabi::encode(&[Token::Bytes(metadata.to_vec()), Token::Bool(exists)])
    }
}
