//! Interface de terminal do autosplit: spinner e saída colorida.
//!
//! Usa as crates `indicatif` para o spinner de progresso e `console` para
//! estilização com cores. O [`JobProgress`] acompanha visualmente
//! um job de divisão no terminal enquanto ele é consultado.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::jobs::{Job, JobStatus};
use crate::llama::Segment;
use crate::split_plan::SplitPlan;

/// Indicador visual de progresso para um job de divisão no terminal.
///
/// Exibe um spinner animado durante o processamento e mensagens
/// coloridas para sucesso (verde), falha (vermelho) e confiança baixa (amarelo).
pub struct JobProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
    yellow: Style,
}

impl JobProgress {
    /// Inicia o spinner com o nome do arquivo e retorna a instância de progresso.
    pub fn start(file_name: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("{}: {file_name}", JobStatus::Pending));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Atualiza a mensagem do spinner para refletir o status atual.
    pub fn update_status(&self, status: JobStatus) {
        self.pb.set_message(format!("{status}…"));
    }

    /// Finaliza o spinner e exibe o resultado final do job.
    ///
    /// Sucesso é mostrado em verde com checkmark e a lista de segmentos;
    /// falha em vermelho com X e a mensagem de erro.
    pub fn complete(&self, job: &Job) {
        self.pb.finish_and_clear();
        match (job.status, &job.result, &job.error_message) {
            (JobStatus::Completed, Some(result), _) => {
                println!(
                    "  {} Split completed with {} segments:",
                    self.green.apply_to("✓"),
                    result.segments.len()
                );
                for segment in &result.segments {
                    let style = if segment.confidence_category == "high" {
                        &self.green
                    } else {
                        &self.yellow
                    };
                    println!("    - {}", style.apply_to(describe_segment(segment)));
                }
            }
            (_, _, message) => {
                println!(
                    "  {} Job failed: {}",
                    self.red.apply_to("✗"),
                    message.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }

    /// Imprime o plano de divisão, uma linha por arquivo de saída.
    pub fn print_plan(&self, plan: &SplitPlan) {
        println!();
        println!(
            "{}",
            self.green
                .apply_to(format!("─── Split plan ({} pages) ───", plan.total_pages))
        );
        for part in &plan.parts {
            println!(
                "  {} (pages {}-{})",
                part.file_name, part.start_page, part.end_page
            );
        }
    }
}

// Mesmo formato do exemplo de linha de comando da LlamaCloud.
fn describe_segment(segment: &Segment) -> String {
    format!(
        "{}: Pages {:?} ({} confidence)",
        segment.category, segment.pages, segment.confidence_category
    )
}
