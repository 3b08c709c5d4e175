//! # Módulo del Motor de Planificación
//!
//! Este módulo implementa las seis políticas de planificación de CPU sobre un
//! mismo patrón de avance discreto del reloj: en cada iteración se despacha
//! un proceso del conjunto de listos (emitiendo un intervalo de ejecución) o,
//! si no hay procesos listos pero quedan llegadas futuras, se emite un
//! intervalo ocioso hasta la próxima llegada.
//!
//! El motor es secuencial y totalmente determinista: dos corridas sobre
//! copias independientes del mismo conjunto de procesos producen líneas de
//! tiempo idénticas.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::error::Error;
use std::fmt;

use crate::config;
use crate::metrics::{Metrics, MetricsCalculator};
use crate::process::Process;
use crate::timeline::Timeline;

/// Políticas de planificación disponibles.
///
/// El conjunto es cerrado: cada variante tiene exactamente una
/// implementación en el motor, y el `match` sobre la política es exhaustivo.
/// Round Robin lleva su quantum dentro de la variante, igual que el resto de
/// los parámetros por política.
#[derive(Clone, Debug, PartialEq)]
pub enum SchedulingPolicy {
    /// First-Come First-Served: no preemptivo, en orden de llegada
    Fcfs,
    /// Shortest-Job-First no preemptivo: ráfaga más corta primero
    NonPreemptiveSjf,
    /// Shortest-Job-First preemptivo: reevalúa el tiempo restante cada unidad
    PreemptiveSjf,
    /// Round Robin preemptivo con quantum fijo
    RoundRobin {
        /// Tiempo máximo de ejecución continua por despacho (> 0)
        quantum: f64,
    },
    /// Por prioridad, preemptivo: reevalúa cada unidad de tiempo
    PreemptivePriority,
    /// Por prioridad, no preemptivo
    NonPreemptivePriority,
}

impl SchedulingPolicy {
    /// Crea una política Round Robin con el quantum indicado.
    pub fn round_robin(quantum: f64) -> Self {
        Self::RoundRobin { quantum }
    }

    /// Indica si la política puede interrumpir a un proceso en ejecución.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_simulator::SchedulingPolicy;
    ///
    /// assert!(!SchedulingPolicy::Fcfs.is_preemptive());
    /// assert!(SchedulingPolicy::round_robin(2.0).is_preemptive());
    /// assert!(SchedulingPolicy::PreemptivePriority.is_preemptive());
    /// ```
    pub fn is_preemptive(&self) -> bool {
        match self {
            Self::Fcfs | Self::NonPreemptiveSjf | Self::NonPreemptivePriority => false,
            Self::PreemptiveSjf | Self::RoundRobin { .. } | Self::PreemptivePriority => true,
        }
    }

    /// Las seis políticas en su orden canónico, con el quantum indicado
    /// para Round Robin.
    pub fn all(quantum: f64) -> Vec<Self> {
        vec![
            Self::Fcfs,
            Self::PreemptiveSjf,
            Self::NonPreemptiveSjf,
            Self::RoundRobin { quantum },
            Self::PreemptivePriority,
            Self::NonPreemptivePriority,
        ]
    }

    /// Nombre corto apto para nombres de archivo.
    pub fn file_slug(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::NonPreemptiveSjf => "sjf_no_preemptivo",
            Self::PreemptiveSjf => "sjf_preemptivo",
            Self::RoundRobin { .. } => "round_robin",
            Self::PreemptivePriority => "prioridad_preemptiva",
            Self::NonPreemptivePriority => "prioridad_no_preemptiva",
        }
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fcfs => write!(f, "FCFS"),
            Self::NonPreemptiveSjf => write!(f, "SJF no preemptivo"),
            Self::PreemptiveSjf => write!(f, "SJF preemptivo"),
            Self::RoundRobin { quantum } => write!(f, "Round Robin (quantum {})", quantum),
            Self::PreemptivePriority => write!(f, "Prioridad preemptiva"),
            Self::NonPreemptivePriority => write!(f, "Prioridad no preemptiva"),
        }
    }
}

/// Errores del motor de planificación.
#[derive(Clone, Debug, PartialEq)]
pub enum SchedulerError {
    /// El conjunto de listos quedó vacío sin llegadas futuras mientras aún
    /// quedaban procesos incompletos. Para entradas válidas este estado es
    /// inalcanzable: indica un defecto o un conjunto de procesos malformado
    /// que eludió la validación de ingesta.
    ReadyQueueStarved {
        /// Política cuya corrida falló
        policy: String,
        /// Instante del reloj simulado en que se detectó el estado
        now: f64,
        /// Cantidad de procesos sin completar
        pending: usize,
    },
    /// El quantum de Round Robin no es positivo; la corrida no progresaría.
    InvalidQuantum {
        /// Quantum recibido
        quantum: f64,
    },
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadyQueueStarved { policy, now, pending } => write!(
                f,
                "conjunto de listos vacío sin llegadas futuras en t={} ({} procesos incompletos, política {})",
                now, pending, policy
            ),
            Self::InvalidQuantum { quantum } => {
                write!(f, "quantum inválido para Round Robin: {} (debe ser > 0)", quantum)
            }
        }
    }
}

impl Error for SchedulerError {}

/// Resultado de una corrida de planificación.
///
/// Se construye una sola vez por corrida y es inmutable: lo consumen la
/// calculadora de métricas y la generación de reportes.
#[derive(Clone, Debug, PartialEq)]
pub struct SchedulingResult {
    policy: SchedulingPolicy,
    timeline: Timeline,
    processes: Vec<Process>,
    context_switches: usize,
    total_time: f64,
    context_switch_time: f64,
}

impl SchedulingResult {
    pub(crate) fn new(
        policy: SchedulingPolicy,
        timeline: Timeline,
        processes: Vec<Process>,
        context_switches: usize,
        total_time: f64,
        context_switch_time: f64,
    ) -> Self {
        Self {
            policy,
            timeline,
            processes,
            context_switches,
            total_time,
            context_switch_time,
        }
    }

    /// Política que produjo este resultado.
    pub fn policy(&self) -> &SchedulingPolicy {
        &self.policy
    }

    /// Línea de tiempo de la corrida.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Conjunto de procesos con los campos de progreso finales.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Cantidad de cambios de contexto cobrados durante la corrida.
    pub fn context_switches(&self) -> usize {
        self.context_switches
    }

    /// Makespan de la simulación: fin del último intervalo.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Sobrecosto total por cambios de contexto
    /// (`context_switches × context_switch_time`).
    pub fn context_switch_overhead(&self) -> f64 {
        self.context_switches as f64 * self.context_switch_time
    }

    /// Calcula las métricas de la corrida con los puntos de control de
    /// throughput por defecto.
    ///
    /// # Returns
    ///
    /// `Some(Metrics)` si al menos un proceso terminó,
    /// `None` para corridas sin procesos completados
    pub fn metrics(&self) -> Option<Metrics> {
        MetricsCalculator::default().calculate(self)
    }
}

/// Motor de planificación: ejecuta una política sobre un conjunto de
/// procesos y produce un [`SchedulingResult`].
///
/// El motor toma posesión del conjunto de procesos (`Vec<Process>`) porque
/// muta sus campos de progreso en el lugar. Reutilizar los mismos registros
/// en dos corridas corrompería los resultados, así que el contrato exige una
/// copia fresca por corrida; además, el motor restablece cada registro antes
/// de comenzar.
///
/// # Examples
///
/// ```rust
/// use cpu_scheduler_simulator::{Priority, Process, Scheduler, SchedulingPolicy};
///
/// let processes = vec![
///     Process::new("P1", 0.0, 5.0, Priority::Normal),
///     Process::new("P2", 1.0, 3.0, Priority::High),
/// ];
///
/// let scheduler = Scheduler::new(0.0);
/// let result = scheduler.run(SchedulingPolicy::Fcfs, processes).unwrap();
/// assert_eq!(result.total_time(), 8.0);
/// ```
#[derive(Clone, Debug)]
pub struct Scheduler {
    context_switch_time: f64,
}

type ProcessCmp = fn(&Process, &Process) -> Ordering;

impl Scheduler {
    /// Crea un motor con el costo de cambio de contexto indicado.
    ///
    /// # Panics
    ///
    /// Hace panic si `context_switch_time` es negativo.
    pub fn new(context_switch_time: f64) -> Self {
        assert!(
            context_switch_time >= 0.0,
            "el costo de cambio de contexto no puede ser negativo"
        );
        Self { context_switch_time }
    }

    /// Costo de cambio de contexto configurado.
    pub fn context_switch_time(&self) -> f64 {
        self.context_switch_time
    }

    /// Ejecuta una política sobre un conjunto de procesos.
    ///
    /// Los procesos se restablecen y se ordenan de forma estable por tiempo
    /// de llegada (los empates conservan el orden de entrada) antes de
    /// comenzar. Un conjunto vacío es un caso válido: produce una línea de
    /// tiempo vacía con `total_time = 0`.
    ///
    /// # Arguments
    ///
    /// * `policy` - Política a ejecutar
    /// * `processes` - Conjunto de procesos, propiedad exclusiva de esta corrida
    ///
    /// # Returns
    ///
    /// El [`SchedulingResult`] de la corrida, o [`SchedulerError`] si se
    /// detecta un estado inconsistente
    pub fn run(
        &self,
        policy: SchedulingPolicy,
        mut processes: Vec<Process>,
    ) -> Result<SchedulingResult, SchedulerError> {
        for process in &mut processes {
            process.reset();
        }
        processes.sort_by(|a, b| a.arrival_time.total_cmp(&b.arrival_time));

        if processes.is_empty() {
            return Ok(SchedulingResult::new(
                policy,
                Timeline::new(),
                processes,
                0,
                0.0,
                self.context_switch_time,
            ));
        }

        match policy {
            SchedulingPolicy::Fcfs => self.run_non_preemptive(policy, processes, cmp_arrival),
            SchedulingPolicy::NonPreemptiveSjf => {
                self.run_non_preemptive(policy, processes, cmp_burst)
            }
            SchedulingPolicy::NonPreemptivePriority => {
                self.run_non_preemptive(policy, processes, cmp_priority)
            }
            SchedulingPolicy::PreemptiveSjf => {
                self.run_preemptive(policy, processes, cmp_remaining)
            }
            SchedulingPolicy::PreemptivePriority => {
                self.run_preemptive(policy, processes, cmp_priority)
            }
            SchedulingPolicy::RoundRobin { quantum } => self.run_round_robin(quantum, processes),
        }
    }

    /// Patrón compartido de las políticas no preemptivas: el proceso elegido
    /// ejecuta su ráfaga completa de una sola vez.
    fn run_non_preemptive(
        &self,
        policy: SchedulingPolicy,
        mut processes: Vec<Process>,
        cmp: ProcessCmp,
    ) -> Result<SchedulingResult, SchedulerError> {
        let total = processes.len();
        let mut timeline = Timeline::new();
        let mut now = 0.0;
        let mut context_switches = 0;
        let mut completed = 0;
        let mut last_dispatched: Option<usize> = None;

        while completed < total {
            if let Some(index) = ready_index(&processes, now, cmp) {
                if let Some(previous) = last_dispatched {
                    if previous != index {
                        context_switches += 1;
                        now += self.context_switch_time;
                    }
                }

                let process = &mut processes[index];
                if process.start_time.is_none() {
                    process.start_time = Some(now);
                }

                let end = now + process.remaining_time;
                timeline.push_execution(&process.id, now, end);
                now = end;
                process.remaining_time = 0.0;
                process.completion_time = Some(now);
                completed += 1;
                last_dispatched = Some(index);
            } else {
                now = self.advance_to_next_arrival(&policy, &processes, now, &mut timeline)?;
            }
        }

        Ok(SchedulingResult::new(
            policy,
            timeline,
            processes,
            context_switches,
            now,
            self.context_switch_time,
        ))
    }

    /// Patrón compartido de SJF preemptivo y prioridad preemptiva: la
    /// selección se reevalúa cada unidad de tiempo (o menos, si al proceso
    /// le queda menos de una unidad). Las unidades contiguas del mismo
    /// proceso se fusionan en un único intervalo.
    fn run_preemptive(
        &self,
        policy: SchedulingPolicy,
        mut processes: Vec<Process>,
        cmp: ProcessCmp,
    ) -> Result<SchedulingResult, SchedulerError> {
        let total = processes.len();
        let mut timeline = Timeline::new();
        let mut now = 0.0;
        let mut context_switches = 0;
        let mut completed = 0;
        let mut last_dispatched: Option<usize> = None;

        while completed < total {
            if let Some(index) = ready_index(&processes, now, cmp) {
                if last_dispatched != Some(index) {
                    if last_dispatched.is_some() {
                        context_switches += 1;
                        now += self.context_switch_time;
                    }
                    if processes[index].start_time.is_none() {
                        processes[index].start_time = Some(now);
                    }
                }

                let process = &mut processes[index];
                let slice = process.remaining_time.min(1.0);
                timeline.push_execution_merged(&process.id, now, now + slice);
                now += slice;
                process.remaining_time -= slice;

                if process.remaining_time <= 0.0 {
                    process.remaining_time = 0.0;
                    process.completion_time = Some(now);
                    completed += 1;
                }
                last_dispatched = Some(index);
            } else {
                now = self.advance_to_next_arrival(&policy, &processes, now, &mut timeline)?;
            }
        }

        Ok(SchedulingResult::new(
            policy,
            timeline,
            processes,
            context_switches,
            now,
            self.context_switch_time,
        ))
    }

    /// Round Robin con cola FIFO y quantum fijo.
    ///
    /// Cuando el quantum expira con trabajo pendiente, los procesos que
    /// llegaron durante ese quantum entran a la cola antes de reencolar al
    /// proceso interrumpido: así los recién llegados conservan su lugar
    /// según el orden de llegada. Se cobra un cambio de contexto tras cada
    /// despacho al que le sigue otro despacho, porque Round Robin cambia o
    /// reselecciona al proceso en ejecución en cada frontera de quantum.
    fn run_round_robin(
        &self,
        quantum: f64,
        mut processes: Vec<Process>,
    ) -> Result<SchedulingResult, SchedulerError> {
        if quantum <= 0.0 {
            return Err(SchedulerError::InvalidQuantum { quantum });
        }

        let policy = SchedulingPolicy::RoundRobin { quantum };
        let total = processes.len();
        let mut timeline = Timeline::new();
        let mut now = 0.0;
        let mut context_switches = 0;
        let mut completed = 0;
        let mut ready_queue: VecDeque<usize> = VecDeque::new();
        // Índice del próximo proceso aún no admitido (procesos ordenados por llegada)
        let mut next_to_admit = 0;

        while completed < total {
            admit_arrivals(&processes, now, &mut next_to_admit, &mut ready_queue);

            if let Some(index) = ready_queue.pop_front() {
                let process = &mut processes[index];
                if process.start_time.is_none() {
                    process.start_time = Some(now);
                }

                let slice = process.remaining_time.min(quantum);
                timeline.push_execution(&process.id, now, now + slice);
                now += slice;
                process.remaining_time -= slice;

                if process.remaining_time <= 0.0 {
                    process.remaining_time = 0.0;
                    process.completion_time = Some(now);
                    completed += 1;
                } else {
                    // Los llegados durante el quantum entran antes que el interrumpido
                    admit_arrivals(&processes, now, &mut next_to_admit, &mut ready_queue);
                    ready_queue.push_back(index);
                }

                if completed < total {
                    context_switches += 1;
                    now += self.context_switch_time;
                }
            } else if next_to_admit < total {
                let next = processes[next_to_admit].arrival_time;
                timeline.push_idle(now, next);
                now = next;
            } else {
                return Err(SchedulerError::ReadyQueueStarved {
                    policy: policy.to_string(),
                    now,
                    pending: total - completed,
                });
            }
        }

        Ok(SchedulingResult::new(
            policy,
            timeline,
            processes,
            context_switches,
            now,
            self.context_switch_time,
        ))
    }

    /// Emite un intervalo ocioso hasta la próxima llegada pendiente.
    ///
    /// El mínimo se recalcula en cada invocación sobre los procesos aún
    /// incompletos. Si no existe una llegada estrictamente futura mientras
    /// quedan procesos incompletos, el estado es inconsistente y la corrida
    /// falla con [`SchedulerError::ReadyQueueStarved`].
    fn advance_to_next_arrival(
        &self,
        policy: &SchedulingPolicy,
        processes: &[Process],
        now: f64,
        timeline: &mut Timeline,
    ) -> Result<f64, SchedulerError> {
        let pending = processes.iter().filter(|p| !p.is_completed()).count();
        let next = processes
            .iter()
            .filter(|p| !p.is_completed())
            .map(|p| p.arrival_time)
            .min_by(f64::total_cmp)
            .filter(|&arrival| arrival > now)
            .ok_or(SchedulerError::ReadyQueueStarved {
                policy: policy.to_string(),
                now,
                pending,
            })?;

        timeline.push_idle(now, next);
        Ok(next)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(config::DEFAULT_CONTEXT_SWITCH_TIME)
    }
}

/// Índice del proceso a despachar entre los listos en `now`, según el
/// comparador de la política. Ante empates totales gana el que aparece
/// primero en el orden de entrada (`min_by` devuelve el primer mínimo).
fn ready_index(processes: &[Process], now: f64, cmp: ProcessCmp) -> Option<usize> {
    processes
        .iter()
        .enumerate()
        .filter(|(_, p)| p.arrival_time <= now && !p.is_completed() && p.remaining_time > 0.0)
        .min_by(|a, b| cmp(a.1, b.1))
        .map(|(index, _)| index)
}

/// Encola los procesos ya llegados que aún no fueron admitidos a la cola de
/// listos de Round Robin, en orden de llegada.
fn admit_arrivals(
    processes: &[Process],
    now: f64,
    next_to_admit: &mut usize,
    ready_queue: &mut VecDeque<usize>,
) {
    while *next_to_admit < processes.len() && processes[*next_to_admit].arrival_time <= now {
        if processes[*next_to_admit].remaining_time > 0.0 {
            ready_queue.push_back(*next_to_admit);
        }
        *next_to_admit += 1;
    }
}

/// FCFS: orden de llegada; empates por orden de entrada.
fn cmp_arrival(a: &Process, b: &Process) -> Ordering {
    a.arrival_time.total_cmp(&b.arrival_time)
}

/// SJF no preemptivo: ráfaga más corta, luego llegada.
fn cmp_burst(a: &Process, b: &Process) -> Ordering {
    a.burst_time
        .total_cmp(&b.burst_time)
        .then(a.arrival_time.total_cmp(&b.arrival_time))
}

/// SJF preemptivo: tiempo restante, luego llegada, luego identificador.
/// El desempate por identificador es explícito para que el resultado no
/// dependa de la estabilidad de ninguna ordenación subyacente.
fn cmp_remaining(a: &Process, b: &Process) -> Ordering {
    a.remaining_time
        .total_cmp(&b.remaining_time)
        .then(a.arrival_time.total_cmp(&b.arrival_time))
        .then_with(|| a.id.cmp(&b.id))
}

/// Políticas por prioridad: prioridad descendente, luego llegada; los
/// empates restantes conservan el orden de entrada.
fn cmp_priority(a: &Process, b: &Process) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then(a.arrival_time.total_cmp(&b.arrival_time))
}
