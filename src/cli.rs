//! Interface de linha de comando do autosplit baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (serve, split)
//! e flags globais (--config, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// autosplit: divide documentos em jobs assíncronos via LlamaCloud.
#[derive(Debug, Parser)]
#[command(name = "autosplit", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração (padrão: ./autosplit.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sobe o servidor HTTP de jobs.
    Serve {
        /// Endereço de escuta; sobrescreve `bind_addr` da configuração.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Divide um documento localmente e mostra o resultado.
    Split {
        /// Caminho do documento (PDF).
        file: PathBuf,

        /// Descrição da categoria; sobrescreve a descrição padrão.
        #[arg(long)]
        category_description: Option<String>,
    },
}
