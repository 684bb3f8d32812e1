//! Encrypted credential storage.
//!
//! Two small facilities built on the same AES-256-CBC file format with
//! build-time embedded keys: [`Secret`] caches an interactively prompted
//! password, and [`TokenStore`] persists the bearer token across restarts
//! so the tracking loop can authenticate without re-prompting.

use super::data_storage::DataStorage;
use aes::Aes256;
use anyhow::Result;
use base64::prelude::*;
use block_modes::block_padding::Pkcs7;
use block_modes::{BlockMode, Cbc};
use dialoguer::{theme::ColorfulTheme, Password};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

// Include generated metadata with encryption keys
include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

type Aes256Cbc = Cbc<Aes256, Pkcs7>;

fn encrypt_to_file(path: &PathBuf, plaintext: &str) -> Result<()> {
    let cipher = Aes256Cbc::new_from_slices(APP_METADATA_ENCRYPTION_KEY, APP_METADATA_ENCRYPTION_IV)?;
    let ciphertext = cipher.encrypt_vec(plaintext.as_bytes());
    let encoded = BASE64_STANDARD.encode(&ciphertext);

    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let mut file = File::create(path)?;
    file.write_all(encoded.as_bytes())?;
    Ok(())
}

fn decrypt_from_file(path: &PathBuf) -> Result<String> {
    let mut file = File::open(path)?;
    let mut encoded = String::new();
    file.read_to_string(&mut encoded)?;
    let ciphertext = BASE64_STANDARD.decode(encoded)?;
    let cipher = Aes256Cbc::new_from_slices(APP_METADATA_ENCRYPTION_KEY, APP_METADATA_ENCRYPTION_IV)?;
    let decrypted = cipher.decrypt_vec(&ciphertext)?;
    Ok(String::from_utf8(decrypted)?)
}

/// Interactive password prompt with encrypted on-disk cache.
#[derive(Clone, Debug)]
pub struct Secret {
    prompt: String,
    secret_file_path: PathBuf,
}

impl Secret {
    pub fn new(secret_name: &str, prompt: &str) -> Self {
        let secret_file_path = DataStorage::new().get_path(secret_name).unwrap_or_else(|_| PathBuf::from(secret_name));

        Self {
            secret_file_path,
            prompt: prompt.to_owned(),
        }
    }

    /// Returns the cached password, prompting only when no valid cache exists.
    pub fn get_or_prompt(&self) -> Result<String> {
        if fs::metadata(&self.secret_file_path).is_ok() {
            if let Ok(password) = decrypt_from_file(&self.secret_file_path) {
                return Ok(password);
            }
        }
        self.prompt()
    }

    /// Prompts for the password and refreshes the encrypted cache.
    pub fn prompt(&self) -> Result<String> {
        let password = Password::with_theme(&ColorfulTheme::default()).with_prompt(&self.prompt).interact()?;
        encrypt_to_file(&self.secret_file_path, &password)?;
        Ok(password)
    }

    /// Removes the cached password file if one exists.
    pub fn delete(&self) -> Result<()> {
        if self.secret_file_path.exists() {
            fs::remove_file(&self.secret_file_path)?;
        }
        Ok(())
    }
}

/// Encrypted key-value store for authentication tokens.
///
/// Each key maps to one encrypted file in the application data directory,
/// so the token survives restarts without ever touching the config file.
#[derive(Clone, Debug)]
pub struct TokenStore;

impl TokenStore {
    fn path(key: &str) -> Result<PathBuf> {
        DataStorage::new().get_path(&format!(".{}", key))
    }

    pub fn get(key: &str) -> Result<Option<String>> {
        let path = Self::path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(decrypt_from_file(&path)?))
    }

    pub fn set(key: &str, value: &str) -> Result<()> {
        encrypt_to_file(&Self::path(key)?, value)
    }

    pub fn remove(key: &str) -> Result<()> {
        let path = Self::path(key)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
