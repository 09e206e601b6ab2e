use super::{Address, Hash, Signature};
use crate::crypto::merkle_root;
use crate::error::MalformedInput;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Identifies the parts a block was split into for gossip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSetHeader {
    pub total: u32,
    pub hash: Hash,
}

/// A block identifier: the header hash plus its part-set header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockId {
    pub hash: Hash,
    pub part_set_header: PartSetHeader,
}

impl BlockId {
    /// Canonical encoding, used in vote sign-bytes and header hashing.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(68);
        out.extend_from_slice(&self.hash.0);
        out.extend_from_slice(&self.part_set_header.total.to_be_bytes());
        out.extend_from_slice(&self.part_set_header.hash.0);
        out
    }
}

/// A block header.
/// Only the fields a light client needs; the block body is never downloaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Chain this block belongs to.
    pub chain_id: String,
    /// Block height, strictly increasing from 1.
    pub height: u64,
    /// Block time, as proposed and agreed by the validators.
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
    /// Identifier of the previous block (absent at the first height).
    pub last_block_id: Option<BlockId>,
    /// Hash of the validator set that signs this header's commit.
    pub validators_hash: Hash,
    /// Hash of the validator set that signs the next header's commit.
    pub next_validators_hash: Hash,
    /// Hash of the consensus parameters.
    pub consensus_hash: Hash,
    /// Application state root after the previous block.
    pub app_hash: Hash,
    /// Root of the previous block's execution results.
    pub last_results_hash: Hash,
    /// Validator that proposed this block.
    pub proposer_address: Address,
}

impl Header {
    /// Merkle root over the canonical encoding of every header field.
    /// This is the hash a commit's `block_id` must carry.
    pub fn hash(&self) -> Hash {
        let last_block_id = self
            .last_block_id
            .as_ref()
            .map(BlockId::encode)
            .unwrap_or_default();

        let fields: [Vec<u8>; 10] = [
            self.chain_id.as_bytes().to_vec(),
            self.height.to_be_bytes().to_vec(),
            self.time.unix_timestamp_nanos().to_be_bytes().to_vec(),
            last_block_id,
            self.validators_hash.0.to_vec(),
            self.next_validators_hash.0.to_vec(),
            self.consensus_hash.0.to_vec(),
            self.app_hash.0.to_vec(),
            self.last_results_hash.0.to_vec(),
            self.proposer_address.0.to_vec(),
        ];
        Hash(merkle_root(&fields))
    }
}

/// One validator's slot in a commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "flag", rename_all = "snake_case")]
pub enum CommitSig {
    /// The validator did not vote (or the vote did not arrive in time).
    Absent,
    /// A vote for the committed block. Counts towards voting power.
    ForBlock {
        validator_address: Address,
        signature: Signature,
    },
    /// A vote for no block. Signed, but never counted.
    Nil {
        validator_address: Address,
        signature: Signature,
    },
}

impl CommitSig {
    pub fn validator_address(&self) -> Option<&Address> {
        match self {
            CommitSig::Absent => None,
            CommitSig::ForBlock {
                validator_address, ..
            }
            | CommitSig::Nil {
                validator_address, ..
            } => Some(validator_address),
        }
    }
}

/// The +2/3 precommits that finalized a block.
///
/// `signatures` is aligned with the validator set that produced the commit:
/// slot `i` belongs to validator `i` of that set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub height: u64,
    pub round: u32,
    pub block_id: BlockId,
    pub signatures: Vec<CommitSig>,
}

/// A header together with the commit that finalized it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedHeader {
    pub header: Header,
    pub commit: Commit,
}

impl SignedHeader {
    /// Structural checks that need no validator set and no signatures.
    pub fn validate_basic(&self, chain_id: &str) -> Result<(), MalformedInput> {
        if self.header.chain_id != chain_id {
            return Err(MalformedInput::ChainIdMismatch {
                expected: chain_id.to_string(),
                got: self.header.chain_id.clone(),
            });
        }

        if self.header.height == 0 {
            return Err(MalformedInput::ZeroHeight);
        }

        if self.commit.height != self.header.height {
            return Err(MalformedInput::CommitHeightMismatch {
                header: self.header.height,
                commit: self.commit.height,
            });
        }

        let header_hash = self.header.hash();
        if self.commit.block_id.hash != header_hash {
            return Err(MalformedInput::CommitBlockIdMismatch {
                expected: header_hash,
                got: self.commit.block_id.hash,
            });
        }

        if self.commit.signatures.is_empty() {
            return Err(MalformedInput::EmptyCommit);
        }

        Ok(())
    }
}
