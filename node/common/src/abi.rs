use ethers::abi::{decode, encode, ParamType, Token};

use crate::error::{FetchError, FetchResult};

const PAYLOAD: &str = "belief payload";

/// Decode an attestation payload under the `string belief` schema.
///
/// Only the canonical encoding of exactly one string is accepted: short,
/// padded-out or trailing bytes are rejected rather than yielding partial text.
pub fn decode_belief(data: &[u8]) -> FetchResult<String> {
    // string and bytes share one ABI layout; decoding as bytes keeps UTF-8
    // validation strict
    let tokens = decode(&[ParamType::Bytes], data).map_err(|e| FetchError::decode(PAYLOAD, e))?;

    if encode(&tokens) != data {
        return Err(FetchError::decode(
            PAYLOAD,
            format!("{} bytes is not a canonical single-string encoding", data.len()),
        ));
    }

    match tokens.into_iter().next() {
        Some(Token::Bytes(raw)) => String::from_utf8(raw).map_err(|e| FetchError::decode(PAYLOAD, e)),
        other => Err(FetchError::decode(PAYLOAD, format!("unexpected token {:?}", other))),
    }
}

/// Encode a belief the way an attester does under the `string belief` schema.
pub fn encode_belief(belief: &str) -> Vec<u8> {
    encode(&[Token::String(belief.to_owned())])
}
