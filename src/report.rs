//! # Módulo de Reportes
//!
//! Este módulo genera los archivos de salida de la simulación: el reporte
//! por política, el reporte comparativo por escenario, el resumen en JSON
//! para consumo programático y el resumen general entre escenarios.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::metrics::{Metrics, MetricsCalculator};
use crate::scheduler::SchedulingResult;

/// Métricas de una política dentro del resumen JSON.
#[derive(Serialize)]
struct PolicySummary<'a> {
    policy: String,
    metrics: &'a Metrics,
}

/// Documento del resumen JSON de un escenario.
#[derive(Serialize)]
struct CaseSummary<'a> {
    case: &'a str,
    policies: Vec<PolicySummary<'a>>,
}

/// Generador de los archivos de resultados.
///
/// Crea el directorio de salida al construirse y escribe en él todos los
/// reportes de la simulación.
pub struct ResultGenerator {
    results_dir: PathBuf,
}

impl ResultGenerator {
    /// Crea un generador que escribe en el directorio indicado.
    ///
    /// # Arguments
    ///
    /// * `results_dir` - Directorio de salida; se crea si no existe
    pub fn new(results_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let results_dir = results_dir.into();
        fs::create_dir_all(&results_dir)
            .with_context(|| format!("no se pudo crear el directorio '{}'", results_dir.display()))?;
        Ok(Self { results_dir })
    }

    /// Directorio de salida configurado.
    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Escribe el reporte detallado de una corrida.
    ///
    /// # Returns
    ///
    /// La ruta del archivo generado
    pub fn write_result_file(
        &self,
        result: &SchedulingResult,
        case: &str,
        calculator: &MetricsCalculator,
    ) -> anyhow::Result<PathBuf> {
        let path = self
            .results_dir
            .join(format!("{}_{}_resultados.txt", case, result.policy().file_slug()));

        let mut report = String::new();
        report.push_str(&"=".repeat(80));
        report.push('\n');
        report.push_str(&format!("Algoritmo de planificación: {}\n", result.policy()));
        report.push_str(&format!("Escenario: {}\n", case));
        report.push_str(&"=".repeat(80));
        report.push_str("\n\n");

        let metrics = calculator.calculate(result);

        if let Some(metrics) = &metrics {
            write_performance_metrics(&mut report, metrics);
            write_throughput_metrics(&mut report, metrics);
        }

        write_time_table(&mut report, result);

        if let Some(metrics) = &metrics {
            write_summary_statistics(&mut report, metrics);
        }

        fs::write(&path, report)
            .with_context(|| format!("no se pudo escribir '{}'", path.display()))?;
        Ok(path)
    }

    /// Escribe el reporte comparativo de un escenario: tabla de métricas y
    /// rankings por métrica sobre las corridas exitosas.
    pub fn write_comparison_report(
        &self,
        results: &[SchedulingResult],
        case: &str,
        calculator: &MetricsCalculator,
    ) -> anyhow::Result<PathBuf> {
        let path = self.results_dir.join(format!("{}_comparacion.txt", case));
        let entries = metric_entries(results, calculator);

        let mut report = String::new();
        report.push_str(&"=".repeat(100));
        report.push('\n');
        report.push_str("COMPARACIÓN DE ALGORITMOS DE PLANIFICACIÓN DE CPU\n");
        report.push_str(&format!("Escenario: {}\n", case));
        report.push_str(&"=".repeat(100));
        report.push_str("\n\n");

        write_comparison_table(&mut report, &entries);
        write_rankings(&mut report, &entries, calculator);

        fs::write(&path, report)
            .with_context(|| format!("no se pudo escribir '{}'", path.display()))?;
        Ok(path)
    }

    /// Escribe el resumen de métricas del escenario en formato JSON.
    pub fn write_json_summary(
        &self,
        results: &[SchedulingResult],
        case: &str,
        calculator: &MetricsCalculator,
    ) -> anyhow::Result<PathBuf> {
        let path = self.results_dir.join(format!("{}_metricas.json", case));
        let entries = metric_entries(results, calculator);

        let document = CaseSummary {
            case,
            policies: entries
                .iter()
                .map(|(name, metrics)| PolicySummary {
                    policy: name.clone(),
                    metrics,
                })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&document)
            .context("no se pudo serializar el resumen de métricas")?;
        fs::write(&path, json)
            .with_context(|| format!("no se pudo escribir '{}'", path.display()))?;
        Ok(path)
    }

    /// Escribe el resumen general: la mejor política por métrica para cada
    /// escenario procesado.
    pub fn write_overall_summary(
        &self,
        cases: &[(String, Vec<SchedulingResult>)],
        calculator: &MetricsCalculator,
    ) -> anyhow::Result<PathBuf> {
        let path = self.results_dir.join("resumen_general.txt");

        let mut report = String::new();
        report.push_str("ALGORITMOS DE PLANIFICACIÓN DE CPU - RESUMEN GENERAL\n");
        report.push_str(&"=".repeat(80));
        report.push_str("\n\n");

        for (case, results) in cases {
            report.push_str(&format!("ESCENARIO: {}\n", case.to_uppercase()));
            report.push_str(&"-".repeat(40));
            report.push('\n');

            let entries = metric_entries(results, calculator);
            if entries.is_empty() {
                report.push_str("Sin corridas completadas.\n\n");
                continue;
            }

            report.push_str("Mejores algoritmos por métrica:\n");

            if let Some((name, metrics)) = entries
                .iter()
                .min_by(|a, b| a.1.avg_waiting_time.total_cmp(&b.1.avg_waiting_time))
            {
                report.push_str(&format!(
                    "  Menor espera promedio: {} ({:.3})\n",
                    name, metrics.avg_waiting_time
                ));
            }
            if let Some((name, metrics)) = entries
                .iter()
                .min_by(|a, b| a.1.avg_turnaround_time.total_cmp(&b.1.avg_turnaround_time))
            {
                report.push_str(&format!(
                    "  Menor turnaround promedio: {} ({:.3})\n",
                    name, metrics.avg_turnaround_time
                ));
            }
            if let Some((name, metrics)) = entries
                .iter()
                .max_by(|a, b| a.1.cpu_efficiency.total_cmp(&b.1.cpu_efficiency))
            {
                report.push_str(&format!(
                    "  Mayor eficiencia de CPU: {} ({:.2}%)\n",
                    name, metrics.cpu_efficiency
                ));
            }
            if let Some(checkpoint) = calculator.reference_checkpoint() {
                if let Some((name, completed)) = entries
                    .iter()
                    .map(|(name, m)| (name, m.throughput_at(checkpoint).unwrap_or(0)))
                    .max_by_key(|&(_, completed)| completed)
                {
                    report.push_str(&format!(
                        "  Mayor throughput a T={}: {} ({} procesos)\n",
                        checkpoint, name, completed
                    ));
                }
            }
            report.push('\n');
        }

        fs::write(&path, report)
            .with_context(|| format!("no se pudo escribir '{}'", path.display()))?;
        Ok(path)
    }
}

/// Pares (nombre de política, métricas) de las corridas con métricas.
fn metric_entries(
    results: &[SchedulingResult],
    calculator: &MetricsCalculator,
) -> Vec<(String, Metrics)> {
    results
        .iter()
        .filter_map(|result| {
            calculator
                .calculate(result)
                .map(|metrics| (result.policy().to_string(), metrics))
        })
        .collect()
}

fn write_performance_metrics(report: &mut String, metrics: &Metrics) {
    report.push_str("MÉTRICAS DE RENDIMIENTO\n");
    report.push_str(&"-".repeat(40));
    report.push('\n');
    report.push_str(&format!("Espera máxima: {:.3} unidades\n", metrics.max_waiting_time));
    report.push_str(&format!("Espera promedio: {:.3} unidades\n", metrics.avg_waiting_time));
    report.push_str(&format!("Turnaround máximo: {:.3} unidades\n", metrics.max_turnaround_time));
    report.push_str(&format!("Turnaround promedio: {:.3} unidades\n", metrics.avg_turnaround_time));
    report.push_str(&format!("Eficiencia de CPU: {:.2}%\n", metrics.cpu_efficiency));
    report.push_str(&format!("Cambios de contexto: {}\n", metrics.context_switches));
    report.push('\n');
}

fn write_throughput_metrics(report: &mut String, metrics: &Metrics) {
    report.push_str("MÉTRICAS DE THROUGHPUT\n");
    report.push_str(&"-".repeat(40));
    report.push('\n');
    for point in &metrics.throughput {
        report.push_str(&format!(
            "Procesos completados a T={}: {}\n",
            point.checkpoint, point.completed
        ));
    }
    report.push('\n');
}

fn write_time_table(report: &mut String, result: &SchedulingResult) {
    report.push_str("LÍNEA DE TIEMPO\n");
    report.push_str(&"-".repeat(80));
    report.push('\n');

    for slot in result.timeline().slots() {
        let owner = slot.process_id().unwrap_or("- OCIOSO -");
        report.push_str(&format!(
            "[ {:10.3} ] - - {} - - [ {:10.3} ]\n",
            slot.start_time, owner, slot.end_time
        ));
    }
    report.push('\n');
}

fn write_summary_statistics(report: &mut String, metrics: &Metrics) {
    report.push_str("ESTADÍSTICAS RESUMIDAS\n");
    report.push_str(&"-".repeat(40));
    report.push('\n');
    report.push_str(&format!(
        "Sobrecosto por cambios de contexto: {:.6} unidades\n",
        metrics.context_switch_overhead
    ));
    report.push_str(&format!("Uso de CPU: {:.2}%\n", metrics.cpu_efficiency));

    let rating = if metrics.avg_waiting_time < 5.0 {
        "EXCELENTE (esperas bajas)"
    } else if metrics.avg_waiting_time < 15.0 {
        "BUENO (esperas moderadas)"
    } else if metrics.avg_waiting_time < 30.0 {
        "REGULAR (esperas altas)"
    } else {
        "DEFICIENTE (esperas muy altas)"
    };
    report.push_str(&format!("Desempeño general: {}\n\n", rating));
}

fn write_comparison_table(report: &mut String, entries: &[(String, Metrics)]) {
    report.push_str("TABLA COMPARATIVA\n");
    report.push_str(&"-".repeat(120));
    report.push('\n');
    report.push_str(&format!(
        "{:<28} {:>12} {:>12} {:>12} {:>12} {:>10} {:>10} {:>10}\n",
        "Algoritmo", "EsperaProm", "EsperaMax", "TurnProm", "TurnMax", "CPU%", "CambiosCtx", "Thr(ref)"
    ));
    report.push_str(&"-".repeat(120));
    report.push('\n');

    for (name, metrics) in entries {
        let reference_throughput = metrics
            .throughput
            .get(1)
            .or_else(|| metrics.throughput.first())
            .map(|point| point.completed)
            .unwrap_or(0);
        report.push_str(&format!(
            "{:<28} {:>12.3} {:>12.3} {:>12.3} {:>12.3} {:>10.2} {:>10} {:>10}\n",
            name,
            metrics.avg_waiting_time,
            metrics.max_waiting_time,
            metrics.avg_turnaround_time,
            metrics.max_turnaround_time,
            metrics.cpu_efficiency,
            metrics.context_switches,
            reference_throughput
        ));
    }
    report.push('\n');
}

fn write_rankings(report: &mut String, entries: &[(String, Metrics)], calculator: &MetricsCalculator) {
    report.push_str("RANKING DE ALGORITMOS POR MÉTRICA\n");
    report.push_str(&"=".repeat(40));
    report.push_str("\n\n");

    if entries.is_empty() {
        return;
    }

    let mut by_waiting: Vec<_> = entries.iter().collect();
    by_waiting.sort_by(|a, b| a.1.avg_waiting_time.total_cmp(&b.1.avg_waiting_time));
    report.push_str("1. Por espera promedio (menor es mejor):\n");
    for (position, (name, metrics)) in by_waiting.iter().enumerate() {
        report.push_str(&format!(
            "   {}. {}: {:.3}\n",
            position + 1,
            name,
            metrics.avg_waiting_time
        ));
    }
    report.push('\n');

    let mut by_turnaround: Vec<_> = entries.iter().collect();
    by_turnaround.sort_by(|a, b| a.1.avg_turnaround_time.total_cmp(&b.1.avg_turnaround_time));
    report.push_str("2. Por turnaround promedio (menor es mejor):\n");
    for (position, (name, metrics)) in by_turnaround.iter().enumerate() {
        report.push_str(&format!(
            "   {}. {}: {:.3}\n",
            position + 1,
            name,
            metrics.avg_turnaround_time
        ));
    }
    report.push('\n');

    let mut by_efficiency: Vec<_> = entries.iter().collect();
    by_efficiency.sort_by(|a, b| b.1.cpu_efficiency.total_cmp(&a.1.cpu_efficiency));
    report.push_str("3. Por eficiencia de CPU (mayor es mejor):\n");
    for (position, (name, metrics)) in by_efficiency.iter().enumerate() {
        report.push_str(&format!(
            "   {}. {}: {:.2}%\n",
            position + 1,
            name,
            metrics.cpu_efficiency
        ));
    }
    report.push('\n');

    if let Some(checkpoint) = calculator.reference_checkpoint() {
        let mut by_throughput: Vec<_> = entries
            .iter()
            .map(|(name, metrics)| (name, metrics.throughput_at(checkpoint).unwrap_or(0)))
            .collect();
        by_throughput.sort_by(|a, b| b.1.cmp(&a.1));
        report.push_str(&format!("4. Por throughput a T={} (mayor es mejor):\n", checkpoint));
        for (position, (name, completed)) in by_throughput.iter().enumerate() {
            report.push_str(&format!("   {}. {}: {}\n", position + 1, name, completed));
        }
        report.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{Priority, Process};
    use crate::scheduler::{Scheduler, SchedulingPolicy};

    fn sample_results() -> Vec<SchedulingResult> {
        let processes = vec![
            Process::new("P1", 0.0, 5.0, Priority::Normal),
            Process::new("P2", 1.0, 3.0, Priority::High),
            Process::new("P3", 2.0, 1.0, Priority::Low),
        ];
        let scheduler = Scheduler::new(0.0);
        SchedulingPolicy::all(2.0)
            .into_iter()
            .map(|policy| scheduler.run(policy, processes.clone()).unwrap())
            .collect()
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cpu_scheduler_report_{}", name));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_result_file_contents() {
        let dir = temp_dir("resultado");
        let generator = ResultGenerator::new(&dir).unwrap();
        let calculator = MetricsCalculator::default();
        let results = sample_results();

        let path = generator
            .write_result_file(&results[0], "caso1", &calculator)
            .unwrap();
        let contents = fs::read_to_string(&path).unwrap();

        assert!(path.file_name().unwrap().to_str().unwrap().contains("fcfs"));
        assert!(contents.contains("MÉTRICAS DE RENDIMIENTO"));
        assert!(contents.contains("LÍNEA DE TIEMPO"));
        assert!(contents.contains("ESTADÍSTICAS RESUMIDAS"));
        assert!(contents.contains("P1"));
    }

    #[test]
    fn test_comparison_report_ranks_all_policies() {
        let dir = temp_dir("comparacion");
        let generator = ResultGenerator::new(&dir).unwrap();
        let calculator = MetricsCalculator::default();
        let results = sample_results();

        let path = generator
            .write_comparison_report(&results, "caso1", &calculator)
            .unwrap();
        let contents = fs::read_to_string(&path).unwrap();

        assert!(contents.contains("TABLA COMPARATIVA"));
        assert!(contents.contains("RANKING DE ALGORITMOS POR MÉTRICA"));
        for policy in SchedulingPolicy::all(2.0) {
            assert!(contents.contains(&policy.to_string()));
        }
    }

    #[test]
    fn test_json_summary_is_valid_json() {
        let dir = temp_dir("json");
        let generator = ResultGenerator::new(&dir).unwrap();
        let calculator = MetricsCalculator::default();
        let results = sample_results();

        let path = generator
            .write_json_summary(&results, "caso1", &calculator)
            .unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();

        assert_eq!(value["case"], "caso1");
        assert_eq!(value["policies"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_overall_summary_names_best_policies() {
        let dir = temp_dir("resumen");
        let generator = ResultGenerator::new(&dir).unwrap();
        let calculator = MetricsCalculator::default();
        let cases = vec![("caso1".to_string(), sample_results())];

        let path = generator.write_overall_summary(&cases, &calculator).unwrap();
        let contents = fs::read_to_string(&path).unwrap();

        assert!(contents.contains("ESCENARIO: CASO1"));
        assert!(contents.contains("Menor espera promedio"));
        assert!(contents.contains("Mayor throughput a T=100"));
    }
}
