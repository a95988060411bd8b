// Wrapper for sha1/sha256 libraries.
// Hash computation is the majority of CPU usage of this library, so the
// backend is swappable via features: pure-rust (RustCrypto), the system
// library through crypto-hash, or ring.

#[cfg(feature = "sha-rust")]
pub type Sha1 = Sha1Rust;
#[cfg(feature = "sha-rust")]
pub type Sha256 = Sha256Rust;

#[cfg(feature = "sha-crypto-hash")]
pub type Sha1 = Sha1CryptoHash;
#[cfg(feature = "sha-crypto-hash")]
pub type Sha256 = Sha256CryptoHash;

#[cfg(feature = "sha-ring")]
pub type Sha1 = Sha1Ring;
#[cfg(feature = "sha-ring")]
pub type Sha256 = Sha256Ring;

pub trait ISha1 {
    fn new() -> Self;
    fn update(&mut self, buf: &[u8]);
    fn finish(self) -> [u8; 20];
}

pub trait ISha256 {
    fn new() -> Self;
    fn update(&mut self, buf: &[u8]);
    fn finish(self) -> [u8; 32];
}

#[cfg(feature = "sha-rust")]
pub struct Sha1Rust {
    inner: sha1::Sha1,
}

#[cfg(feature = "sha-rust")]
impl ISha1 for Sha1Rust {
    fn new() -> Self {
        Sha1Rust {
            inner: <sha1::Sha1 as sha1::Digest>::new(),
        }
    }

    fn update(&mut self, buf: &[u8]) {
        sha1::Digest::update(&mut self.inner, buf)
    }

    fn finish(self) -> [u8; 20] {
        sha1::Digest::finalize(self.inner).into()
    }
}

#[cfg(feature = "sha-rust")]
pub struct Sha256Rust {
    inner: sha2::Sha256,
}

#[cfg(feature = "sha-rust")]
impl ISha256 for Sha256Rust {
    fn new() -> Self {
        Sha256Rust {
            inner: <sha2::Sha256 as sha2::Digest>::new(),
        }
    }

    fn update(&mut self, buf: &[u8]) {
        sha2::Digest::update(&mut self.inner, buf)
    }

    fn finish(self) -> [u8; 32] {
        sha2::Digest::finalize(self.inner).into()
    }
}

#[cfg(feature = "sha-crypto-hash")]
pub struct Sha1CryptoHash {
    inner: crypto_hash::Hasher,
}

#[cfg(feature = "sha-crypto-hash")]
impl ISha1 for Sha1CryptoHash {
    fn new() -> Self {
        Self {
            inner: crypto_hash::Hasher::new(crypto_hash::Algorithm::SHA1),
        }
    }

    fn update(&mut self, buf: &[u8]) {
        use std::io::Write;
        self.inner.write_all(buf).unwrap();
    }

    fn finish(mut self) -> [u8; 20] {
        let result = self.inner.finish();
        debug_assert_eq!(result.len(), 20);
        let mut result_arr = [0u8; 20];
        result_arr.copy_from_slice(&result);
        result_arr
    }
}

#[cfg(feature = "sha-crypto-hash")]
pub struct Sha256CryptoHash {
    inner: crypto_hash::Hasher,
}

#[cfg(feature = "sha-crypto-hash")]
impl ISha256 for Sha256CryptoHash {
    fn new() -> Self {
        Self {
            inner: crypto_hash::Hasher::new(crypto_hash::Algorithm::SHA256),
        }
    }

    fn update(&mut self, buf: &[u8]) {
        use std::io::Write;
        self.inner.write_all(buf).unwrap();
    }

    fn finish(mut self) -> [u8; 32] {
        let result = self.inner.finish();
        debug_assert_eq!(result.len(), 32);
        let mut result_arr = [0u8; 32];
        result_arr.copy_from_slice(&result);
        result_arr
    }
}

#[cfg(feature = "sha-ring")]
pub struct Sha1Ring {
    inner: ring::digest::Context,
}

#[cfg(feature = "sha-ring")]
impl ISha1 for Sha1Ring {
    fn new() -> Self {
        Self {
            inner: ring::digest::Context::new(&ring::digest::SHA1_FOR_LEGACY_USE_ONLY),
        }
    }

    fn update(&mut self, buf: &[u8]) {
        self.inner.update(buf)
    }

    fn finish(self) -> [u8; 20] {
        let digest = self.inner.finish();
        let mut result_arr = [0u8; 20];
        result_arr.copy_from_slice(digest.as_ref());
        result_arr
    }
}

#[cfg(feature = "sha-ring")]
pub struct Sha256Ring {
    inner: ring::digest::Context,
}

#[cfg(feature = "sha-ring")]
impl ISha256 for Sha256Ring {
    fn new() -> Self {
        Self {
            inner: ring::digest::Context::new(&ring::digest::SHA256),
        }
    }

    fn update(&mut self, buf: &[u8]) {
        self.inner.update(buf)
    }

    fn finish(self) -> [u8; 32] {
        let digest = self.inner.finish();
        let mut result_arr = [0u8; 32];
        result_arr.copy_from_slice(digest.as_ref());
        result_arr
    }
}
