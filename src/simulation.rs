//! # Módulo de Simulación Principal
//!
//! Este módulo contiene la lógica principal para ejecutar la simulación:
//! lee los escenarios, corre los seis algoritmos de planificación sobre
//! cada uno y delega en el generador de reportes la escritura de los
//! archivos de resultados. Los escenarios pueden procesarse en serie o en
//! paralelo con un hilo por archivo.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;

use crate::config;
use crate::metrics::MetricsCalculator;
use crate::parser;
use crate::process::Process;
use crate::report::ResultGenerator;
use crate::scheduler::{Scheduler, SchedulerError, SchedulingPolicy, SchedulingResult};

/// Resultado de correr una política sobre un escenario.
///
/// Una política puede fallar (por ejemplo por inanición de la cola de
/// listos) sin impedir que las demás corran sobre el mismo escenario.
pub struct PolicyOutcome {
    /// Política ejecutada
    pub policy: SchedulingPolicy,
    /// Resultado de la corrida
    pub result: Result<SchedulingResult, SchedulerError>,
}

/// Orquestador principal de la simulación.
///
/// La `Simulation` coordina todos los aspectos de una ejecución completa:
/// - Ingesta y validación de los archivos de escenario
/// - Corrida de los seis algoritmos sobre copias independientes del escenario
/// - Cálculo de métricas y escritura de reportes
/// - Procesamiento en paralelo de varios escenarios
pub struct Simulation {
    /// Costo de cada cambio de contexto
    context_switch_time: f64,
    /// Quantum para Round Robin
    quantum: f64,
    /// Calculadora de métricas compartida por todas las corridas
    calculator: MetricsCalculator,
    /// Generador de los archivos de resultados
    generator: ResultGenerator,
}

impl Simulation {
    /// Crea una simulación con los parámetros por defecto.
    ///
    /// # Arguments
    ///
    /// * `generator` - Generador de reportes ya apuntado a su directorio
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use cpu_scheduler_simulator::{ResultGenerator, Simulation};
    ///
    /// let generator = ResultGenerator::new("resultados").unwrap();
    /// let simulation = Simulation::new(generator);
    /// ```
    pub fn new(generator: ResultGenerator) -> Self {
        Self::with_config(
            config::DEFAULT_CONTEXT_SWITCH_TIME,
            config::DEFAULT_QUANTUM,
            config::default_checkpoints(),
            generator,
        )
    }

    /// Crea una simulación con parámetros personalizados.
    ///
    /// # Arguments
    ///
    /// * `context_switch_time` - Costo de cada cambio de contexto (>= 0)
    /// * `quantum` - Quantum para Round Robin (> 0)
    /// * `checkpoints` - Puntos de control de throughput
    /// * `generator` - Generador de reportes
    pub fn with_config(
        context_switch_time: f64,
        quantum: f64,
        checkpoints: Vec<f64>,
        generator: ResultGenerator,
    ) -> Self {
        Self {
            context_switch_time,
            quantum,
            calculator: MetricsCalculator::new(checkpoints),
            generator,
        }
    }

    /// Corre los seis algoritmos sobre un conjunto de procesos.
    ///
    /// Cada política recibe una copia independiente del conjunto: ninguna
    /// corrida observa las mutaciones de otra. El fallo de una política se
    /// registra en su `PolicyOutcome` y las demás continúan.
    ///
    /// # Returns
    ///
    /// Un `PolicyOutcome` por política, en el orden canónico
    pub fn run_policies(&self, processes: &[Process]) -> Vec<PolicyOutcome> {
        let scheduler = Scheduler::new(self.context_switch_time);

        SchedulingPolicy::all(self.quantum)
            .into_iter()
            .map(|policy| {
                let result = scheduler.run(policy.clone(), processes.to_vec());
                if let Err(error) = &result {
                    println!("[ERROR] {}: {}", policy, error);
                }
                PolicyOutcome { policy, result }
            })
            .collect()
    }

    /// Procesa un archivo de escenario completo.
    ///
    /// Lee y valida el CSV, corre los seis algoritmos y escribe el reporte
    /// por política, el comparativo y el resumen JSON del escenario.
    ///
    /// # Returns
    ///
    /// El nombre del escenario y las corridas exitosas, para el resumen
    /// general
    pub fn run_case(&self, path: &Path) -> anyhow::Result<(String, Vec<SchedulingResult>)> {
        let case = case_name(path);
        println!("[CASO] Procesando escenario '{}'", case);

        let processes = parser::parse_csv_file(path)
            .with_context(|| format!("el escenario '{}' es inválido", case))?;
        println!("[CASO] '{}': {} procesos leídos", case, processes.len());

        let outcomes = self.run_policies(&processes);
        let mut results = Vec::new();
        for outcome in outcomes {
            if let Ok(result) = outcome.result {
                self.generator
                    .write_result_file(&result, &case, &self.calculator)?;
                results.push(result);
            }
        }

        self.generator
            .write_comparison_report(&results, &case, &self.calculator)?;
        self.generator
            .write_json_summary(&results, &case, &self.calculator)?;

        println!(
            "[CASO] Escenario '{}' completado ({} de 6 corridas exitosas)",
            case,
            results.len()
        );
        Ok((case, results))
    }

    /// Procesa varios escenarios y escribe el resumen general.
    ///
    /// Con `parallel` activo lanza un hilo por escenario y recolecta los
    /// resultados por un canal; el orden de los escenarios en el resumen es
    /// siempre el orden de `paths`, independiente del orden de finalización
    /// de los hilos. Un escenario fallido no detiene a los demás.
    ///
    /// # Returns
    ///
    /// Error si algún escenario falló, después de procesar todos
    pub fn run_cases(&self, paths: &[PathBuf], parallel: bool) -> anyhow::Result<()> {
        println!(
            "[SIMULADOR] {} escenario(s), modo {}",
            paths.len(),
            if parallel { "paralelo" } else { "secuencial" }
        );

        let mut outcomes: Vec<(usize, anyhow::Result<(String, Vec<SchedulingResult>)>)> =
            Vec::with_capacity(paths.len());

        if parallel && paths.len() > 1 {
            let (tx, rx) = mpsc::channel();
            thread::scope(|scope| {
                for (index, path) in paths.iter().enumerate() {
                    let tx = tx.clone();
                    scope.spawn(move || {
                        let outcome = self.run_case(path);
                        tx.send((index, outcome))
                            .expect("No se pudo enviar el resultado del escenario");
                    });
                }
            });
            drop(tx);
            outcomes.extend(rx.into_iter());
            outcomes.sort_by_key(|(index, _)| *index);
        } else {
            for (index, path) in paths.iter().enumerate() {
                outcomes.push((index, self.run_case(path)));
            }
        }

        let mut cases = Vec::new();
        let mut failures = 0usize;
        for (_, outcome) in outcomes {
            match outcome {
                Ok(case) => cases.push(case),
                Err(error) => {
                    println!("[ERROR] {:#}", error);
                    failures += 1;
                }
            }
        }

        let summary = self.generator.write_overall_summary(&cases, &self.calculator)?;
        println!("[SIMULADOR] Resumen general escrito en '{}'", summary.display());

        if failures > 0 {
            anyhow::bail!("{} escenario(s) fallaron", failures);
        }
        Ok(())
    }
}

/// Nombre del escenario: el nombre del archivo sin extensión.
fn case_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
