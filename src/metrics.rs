//! # Módulo de Métricas
//!
//! Este módulo calcula las métricas de rendimiento derivadas de una corrida
//! completada: tiempos de espera y turnaround, eficiencia de CPU, cambios de
//! contexto y throughput en puntos de control configurables. Las métricas no
//! se almacenan en el resultado: se recalculan bajo demanda a partir del
//! [`SchedulingResult`].

use serde::Serialize;

use crate::config;
use crate::scheduler::SchedulingResult;

/// Procesos completados hasta un punto de control de tiempo.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ThroughputPoint {
    /// Instante del punto de control
    pub checkpoint: f64,
    /// Cantidad de procesos con `completion_time <= checkpoint`
    pub completed: usize,
}

/// Métricas agregadas de una corrida de planificación.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Metrics {
    /// Tiempo de espera promedio sobre los procesos completados
    pub avg_waiting_time: f64,
    /// Tiempo de espera máximo
    pub max_waiting_time: f64,
    /// Turnaround promedio
    pub avg_turnaround_time: f64,
    /// Turnaround máximo
    pub max_turnaround_time: f64,
    /// Porcentaje del makespan con la CPU ejecutando procesos
    pub cpu_efficiency: f64,
    /// Cambios de contexto cobrados en la corrida
    pub context_switches: usize,
    /// Sobrecosto total por cambios de contexto
    pub context_switch_overhead: f64,
    /// Throughput en cada punto de control, en orden
    pub throughput: Vec<ThroughputPoint>,
}

impl Metrics {
    /// Throughput registrado en un punto de control concreto.
    ///
    /// # Returns
    ///
    /// `Some(cantidad)` si el punto de control fue calculado,
    /// `None` si no forma parte del conjunto configurado
    pub fn throughput_at(&self, checkpoint: f64) -> Option<usize> {
        self.throughput
            .iter()
            .find(|point| point.checkpoint == checkpoint)
            .map(|point| point.completed)
    }
}

/// Calculadora de métricas con puntos de control de throughput configurables.
///
/// # Examples
///
/// ```rust
/// use cpu_scheduler_simulator::{MetricsCalculator, Priority, Process, Scheduler, SchedulingPolicy};
///
/// let processes = vec![
///     Process::new("P1", 0.0, 5.0, Priority::Normal),
///     Process::new("P2", 1.0, 3.0, Priority::High),
/// ];
/// let result = Scheduler::new(0.0)
///     .run(SchedulingPolicy::Fcfs, processes)
///     .unwrap();
///
/// let calculator = MetricsCalculator::new(vec![5.0, 10.0]);
/// let metrics = calculator.calculate(&result).unwrap();
/// assert_eq!(metrics.throughput_at(5.0), Some(1));
/// assert_eq!(metrics.throughput_at(10.0), Some(2));
/// ```
#[derive(Clone, Debug)]
pub struct MetricsCalculator {
    checkpoints: Vec<f64>,
}

impl MetricsCalculator {
    /// Crea una calculadora con los puntos de control indicados.
    pub fn new(checkpoints: Vec<f64>) -> Self {
        Self { checkpoints }
    }

    /// Puntos de control configurados.
    pub fn checkpoints(&self) -> &[f64] {
        &self.checkpoints
    }

    /// Punto de control de referencia para comparar throughput entre
    /// políticas: el segundo configurado (100 con los valores por defecto)
    /// o el primero si solo hay uno.
    pub fn reference_checkpoint(&self) -> Option<f64> {
        self.checkpoints.get(1).or_else(|| self.checkpoints.first()).copied()
    }

    /// Calcula las métricas de una corrida.
    ///
    /// Para cada proceso completado: `turnaround = finalización − llegada` y
    /// `espera = turnaround − ráfaga`. La eficiencia de CPU es el porcentaje
    /// del makespan ocupado por intervalos no ociosos (0 si el makespan es 0).
    ///
    /// # Arguments
    ///
    /// * `result` - Resultado de la corrida a medir
    ///
    /// # Returns
    ///
    /// `Some(Metrics)` si al menos un proceso tiene tiempo de finalización,
    /// `None` en caso contrario (incluido el conjunto vacío)
    pub fn calculate(&self, result: &SchedulingResult) -> Option<Metrics> {
        let mut waiting_times = Vec::new();
        let mut turnaround_times = Vec::new();

        for process in result.processes() {
            if let (Some(waiting), Some(turnaround)) =
                (process.waiting_time(), process.turnaround_time())
            {
                waiting_times.push(waiting);
                turnaround_times.push(turnaround);
            }
        }

        if waiting_times.is_empty() {
            return None;
        }

        let count = waiting_times.len() as f64;
        let avg_waiting_time = waiting_times.iter().sum::<f64>() / count;
        let avg_turnaround_time = turnaround_times.iter().sum::<f64>() / count;
        let max_waiting_time = max_of(&waiting_times);
        let max_turnaround_time = max_of(&turnaround_times);

        let total_time = result.total_time();
        let cpu_efficiency = if total_time > 0.0 {
            result.timeline().busy_time() / total_time * 100.0
        } else {
            0.0
        };

        let throughput = self
            .checkpoints
            .iter()
            .map(|&checkpoint| ThroughputPoint {
                checkpoint,
                completed: result
                    .processes()
                    .iter()
                    .filter(|p| p.completion_time.is_some_and(|c| c <= checkpoint))
                    .count(),
            })
            .collect();

        Some(Metrics {
            avg_waiting_time,
            max_waiting_time,
            avg_turnaround_time,
            max_turnaround_time,
            cpu_efficiency,
            context_switches: result.context_switches(),
            context_switch_overhead: result.context_switch_overhead(),
            throughput,
        })
    }
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new(config::default_checkpoints())
    }
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
