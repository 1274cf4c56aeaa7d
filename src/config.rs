//! Configuração do autosplit carregada a partir de `autosplit.toml`.
//!
//! A struct [`AutosplitConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `LLAMAINDEX_API_KEY` tem precedência sobre o arquivo.

use serde::Deserialize;
use std::path::Path;

use crate::error::AutosplitError;
use crate::llama::DEFAULT_BASE_URL;

pub const DEFAULT_CONFIG_FILE: &str = "autosplit.toml";
pub const API_KEY_ENV: &str = "LLAMAINDEX_API_KEY";

/// Descrição padrão da categoria `default` enviada à LlamaCloud.
pub const DEFAULT_CATEGORY_DESCRIPTION: &str = "Pages that belong to the same FACTURA CAMBIARIA invoice but are not the first page. Includes rotated pages, stamps, signatures, Walmart review stamps, or continuation content without the full invoice header.";

/// Configuração de nível superior carregada de `autosplit.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AutosplitConfig {
    /// Chave da API LlamaCloud.
    #[serde(default)]
    pub api_key: String,

    /// URL base da API (sem barra final).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Endereço em que o servidor HTTP escuta.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Descrição da categoria usada quando o cliente não envia uma.
    #[serde(default = "default_category_description")]
    pub default_category_description: String,

    /// Intervalo entre consultas ao job remoto, em milissegundos.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Timeout de cada requisição HTTP à LlamaCloud, em segundos.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Tamanho máximo aceito para upload, em bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_category_description() -> String {
    DEFAULT_CATEGORY_DESCRIPTION.to_string()
}

// A LlamaCloud é consultada a cada 2s.
fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_request_timeout_secs() -> u64 {
    120
}

// 50 MiB.
fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

impl Default for AutosplitConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            bind_addr: default_bind_addr(),
            default_category_description: default_category_description(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl AutosplitConfig {
    /// Carrega a configuração de `autosplit.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self, AutosplitError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Carrega a configuração de um caminho explícito.
    /// Um arquivo ausente não é erro: valem os defaults.
    pub fn load_from(path: &Path) -> Result<Self, AutosplitError> {
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<AutosplitConfig>(&contents)?
        } else {
            Self::default()
        };

        Ok(config.with_env_key(std::env::var(API_KEY_ENV).ok()))
    }

    // Variável de ambiente tem precedência sobre o arquivo de configuração para a chave API.
    fn with_env_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key
            && !key.is_empty()
        {
            self.api_key = key;
        }
        self
    }

    /// Falha se não houver chave da API, exigida por qualquer chamada à LlamaCloud.
    pub fn require_api_key(&self) -> Result<(), AutosplitError> {
        if self.api_key.is_empty() {
            return Err(AutosplitError::Config(format!(
                "{API_KEY_ENV} is not set. Set it in the environment or as api_key in {DEFAULT_CONFIG_FILE}."
            )));
        }
        Ok(())
    }
}
