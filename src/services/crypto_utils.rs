// Asymmetrische Entschlüsselung (Key Unwrap)
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey};

// Symmetrische Verschlüsselung
use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{
    block_padding::NoPadding, BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit,
};

// Kodierung & Speicherhygiene
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use zeroize::Zeroizing;

/// AES block size in bytes. The IV must have exactly this length.
pub const AES_BLOCK_SIZE: usize = 16;

/// Custom error type for key unwrapping and payload decryption.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// The private key could not be parsed from its PEM encoding.
    #[error("Invalid Key: {0}")]
    InvalidKey(String),

    /// A base64 field of the receipt could not be decoded.
    #[error("Base64 decoding failed: {0}")]
    Decode(#[from] base64::DecodeError),

    /// RSA PKCS#1 v1.5 decryption of the wrapped key failed.
    #[error("Unable to unwrap the receipt key. The private key may not match or the data may have been tampered with.")]
    Unwrap,

    /// The unwrapped content key is not a valid AES key size.
    #[error("Invalid AES key length: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),

    /// IV or ciphertext do not fit the AES block structure.
    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// The PKCS#7 padding of the decrypted payload is inconsistent.
    #[error("Invalid PKCS#7 padding. The payload may be corrupted or tampered with.")]
    Padding,
}

/// Parses an RSA private key from PEM.
///
/// Both PKCS#1 (`BEGIN RSA PRIVATE KEY`) and PKCS#8 (`BEGIN PRIVATE KEY`)
/// encodings are accepted.
///
/// # Errors
///
/// Returns `CryptoError::InvalidKey` if neither encoding matches.
pub fn load_private_key_pem(pem: &str) -> Result<RsaPrivateKey, CryptoError> {
    RsaPrivateKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
        .map_err(|e| CryptoError::InvalidKey(e.to_string()))
}

/// Recovers the symmetric content key from the base64 encoded wrapped receipt key.
///
/// The key is only read, so one `RsaPrivateKey` can serve any number of
/// concurrent callers. The returned buffer is wiped on drop.
///
/// # Arguments
///
/// * `private_key` - The relying party's RSA private key.
/// * `wrapped_key` - The base64 encoded, RSA PKCS#1 v1.5 encrypted content key.
///
/// # Errors
///
/// * `CryptoError::Decode` if `wrapped_key` is not valid base64.
/// * `CryptoError::Unwrap` if the RSA decryption fails (wrong key or tampered data).
pub fn unwrap_key(
    private_key: &RsaPrivateKey,
    wrapped_key: &str,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let cipher_bytes = BASE64.decode(wrapped_key.trim())?;
    let content_key = private_key
        .decrypt(Pkcs1v15Encrypt, &cipher_bytes)
        .map_err(|_| CryptoError::Unwrap)?;
    Ok(Zeroizing::new(content_key))
}

/// Decrypts an AES-CBC ciphertext with an explicit IV and removes the PKCS#7 padding.
///
/// The AES variant is chosen by the key length (16, 24 or 32 bytes).
///
/// # Arguments
///
/// * `key` - The symmetric content key.
/// * `iv` - The 16-byte initialization vector.
/// * `cipher_text` - The ciphertext, a non-empty multiple of the block size.
///
/// # Returns
///
/// A `Result` containing the plaintext or a `CryptoError`.
pub fn decrypt_aes_cbc(key: &[u8], iv: &[u8], cipher_text: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if iv.len() != AES_BLOCK_SIZE {
        return Err(CryptoError::MalformedCiphertext(format!(
            "IV must be {} bytes long, got {}",
            AES_BLOCK_SIZE,
            iv.len()
        )));
    }
    if cipher_text.is_empty() || cipher_text.len() % AES_BLOCK_SIZE != 0 {
        return Err(CryptoError::MalformedCiphertext(format!(
            "Ciphertext length {} is not a positive multiple of {}",
            cipher_text.len(),
            AES_BLOCK_SIZE
        )));
    }

    let mut buffer = cipher_text.to_vec();
    match key.len() {
        16 => cbc_decrypt_in_place::<Aes128>(key, iv, &mut buffer)?,
        24 => cbc_decrypt_in_place::<Aes192>(key, iv, &mut buffer)?,
        32 => cbc_decrypt_in_place::<Aes256>(key, iv, &mut buffer)?,
        other => return Err(CryptoError::InvalidKeyLength(other)),
    }

    let plaintext_len = strip_pkcs7_padding(&buffer)?.len();
    buffer.truncate(plaintext_len);
    Ok(buffer)
}

/// Encrypts `plaintext` with AES-CBC after applying PKCS#7 padding.
///
/// Counterpart of `decrypt_aes_cbc`, used to seal test receipts.
pub fn encrypt_aes_cbc(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if iv.len() != AES_BLOCK_SIZE {
        return Err(CryptoError::MalformedCiphertext(format!(
            "IV must be {} bytes long, got {}",
            AES_BLOCK_SIZE,
            iv.len()
        )));
    }

    let pad_len = AES_BLOCK_SIZE - plaintext.len() % AES_BLOCK_SIZE;
    let mut buffer = Vec::with_capacity(plaintext.len() + pad_len);
    buffer.extend_from_slice(plaintext);
    buffer.resize(plaintext.len() + pad_len, pad_len as u8);

    match key.len() {
        16 => cbc_encrypt_in_place::<Aes128>(key, iv, &mut buffer)?,
        24 => cbc_encrypt_in_place::<Aes192>(key, iv, &mut buffer)?,
        32 => cbc_encrypt_in_place::<Aes256>(key, iv, &mut buffer)?,
        other => return Err(CryptoError::InvalidKeyLength(other)),
    }
    Ok(buffer)
}

/// Validates and strips PKCS#7 padding.
///
/// The last byte `p` declares the pad length. `1 <= p <= AES_BLOCK_SIZE` must hold
/// and the last `p` bytes must all equal `p`.
pub fn strip_pkcs7_padding(data: &[u8]) -> Result<&[u8], CryptoError> {
    let pad_len = *data.last().ok_or(CryptoError::Padding)? as usize;
    if pad_len == 0 || pad_len > AES_BLOCK_SIZE || pad_len > data.len() {
        return Err(CryptoError::Padding);
    }

    let (content, padding) = data.split_at(data.len() - pad_len);
    if padding.iter().any(|&b| b as usize != pad_len) {
        return Err(CryptoError::Padding);
    }
    Ok(content)
}

fn cbc_decrypt_in_place<C>(key: &[u8], iv: &[u8], buffer: &mut [u8]) -> Result<(), CryptoError>
where
    C: BlockCipher + BlockDecryptMut + KeyInit,
{
    let decryptor = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?;
    // Padding wird separat und strikt in `strip_pkcs7_padding` geprüft.
    decryptor
        .decrypt_padded_mut::<NoPadding>(buffer)
        .map_err(|_| CryptoError::MalformedCiphertext("ciphertext is not block aligned".to_string()))?;
    Ok(())
}

fn cbc_encrypt_in_place<C>(key: &[u8], iv: &[u8], buffer: &mut [u8]) -> Result<(), CryptoError>
where
    C: BlockCipher + BlockEncryptMut + KeyInit,
{
    let encryptor = cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?;
    let len = buffer.len();
    encryptor
        .encrypt_padded_mut::<NoPadding>(buffer, len)
        .map_err(|_| CryptoError::MalformedCiphertext("plaintext is not block aligned".to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_valid_padding() {
        let data = [b'a', b'b', 3, 3, 3];
        assert_eq!(strip_pkcs7_padding(&data).unwrap(), b"ab");

        let full_block = [16u8; 16];
        assert!(strip_pkcs7_padding(&full_block).unwrap().is_empty());
    }

    #[test]
    fn test_strip_rejects_zero_and_oversized_padding() {
        let mut block = [0u8; 16];
        assert!(matches!(strip_pkcs7_padding(&block), Err(CryptoError::Padding)));

        block[15] = 17;
        assert!(matches!(strip_pkcs7_padding(&block), Err(CryptoError::Padding)));
    }

    #[test]
    fn test_strip_rejects_inconsistent_padding() {
        let data = [b'x', 2, 4, 4, 4];
        assert!(matches!(strip_pkcs7_padding(&data), Err(CryptoError::Padding)));
    }

    #[test]
    fn test_strip_rejects_empty_input() {
        assert!(matches!(strip_pkcs7_padding(&[]), Err(CryptoError::Padding)));
    }

    #[test]
    fn test_encrypt_then_decrypt_all_key_sizes() {
        let iv = [7u8; AES_BLOCK_SIZE];
        for key_len in [16usize, 24, 32] {
            let key = vec![0x42u8; key_len];
            let cipher_text = encrypt_aes_cbc(&key, &iv, b"phone_number").unwrap();
            assert_eq!(cipher_text.len(), AES_BLOCK_SIZE);
            assert_eq!(decrypt_aes_cbc(&key, &iv, &cipher_text).unwrap(), b"phone_number");
        }
    }
}
