use std::ops::ControlFlow;
use std::path::Path;

use sha2::{Digest, Sha256, Sha512};
use strum_macros::{Display, EnumString};

use crate::FileKit;
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha256,
    Sha512,
}

/// Incremental digest state for one [`HashAlgorithm`].
enum Digester {
    Md5(md5::Context),
    Sha256(Sha256),
    Sha512(Sha512),
}

impl Digester {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => Self::Md5(md5::Context::new()),
            HashAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => Self::Sha512(Sha512::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(context) => context.consume(data),
            Self::Sha256(hasher) => hasher.update(data),
            Self::Sha512(hasher) => hasher.update(data),
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Self::Md5(context) => format!("{:x}", context.compute()),
            Self::Sha256(hasher) => hex::encode(hasher.finalize()),
            Self::Sha512(hasher) => hex::encode(hasher.finalize()),
        }
    }
}

impl FileKit {
    /// Lowercase hex digest of the file, streamed through the chunk loop.
    pub fn hash(&self, path: impl AsRef<Path>, algorithm: HashAlgorithm) -> Result<String> {
        let mut digester = Digester::new(algorithm);
        self.read_chunks(path, None, 0, |chunk, _| {
            digester.update(chunk);
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(digester.finalize_hex())
    }
}
