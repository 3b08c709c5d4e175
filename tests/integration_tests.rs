//! Tests de integración para el simulador de planificación de CPU

use cpu_scheduler_simulator::{
    parse_csv, MetricsCalculator, Priority, Process, Scheduler, SchedulingPolicy, TimeSlot,
};

/// Escenario de referencia: P1(0, 5, NORMAL), P2(1, 3, HIGH), P3(2, 1, LOW).
fn reference_processes() -> Vec<Process> {
    vec![
        Process::new("P1", 0.0, 5.0, Priority::Normal),
        Process::new("P2", 1.0, 3.0, Priority::High),
        Process::new("P3", 2.0, 1.0, Priority::Low),
    ]
}

fn process<'a>(result: &'a cpu_scheduler_simulator::SchedulingResult, id: &str) -> &'a Process {
    result
        .processes()
        .iter()
        .find(|p| p.id == id)
        .unwrap_or_else(|| panic!("proceso {} ausente", id))
}

#[test]
fn test_fcfs_reference_scenario() {
    let result = Scheduler::new(0.0)
        .run(SchedulingPolicy::Fcfs, reference_processes())
        .unwrap();

    assert_eq!(
        result.timeline().slots(),
        &[
            TimeSlot::execution("P1", 0.0, 5.0),
            TimeSlot::execution("P2", 5.0, 8.0),
            TimeSlot::execution("P3", 8.0, 9.0),
        ]
    );
    assert_eq!(result.context_switches(), 2);
    assert_eq!(process(&result, "P1").waiting_time(), Some(0.0));
    assert_eq!(process(&result, "P2").waiting_time(), Some(4.0));
    assert_eq!(process(&result, "P3").waiting_time(), Some(6.0));
    assert_eq!(process(&result, "P1").turnaround_time(), Some(5.0));
    assert_eq!(process(&result, "P2").turnaround_time(), Some(7.0));
    assert_eq!(process(&result, "P3").turnaround_time(), Some(7.0));
}

#[test]
fn test_preemptive_priority_reference_scenario() {
    let result = Scheduler::new(0.0)
        .run(SchedulingPolicy::PreemptivePriority, reference_processes())
        .unwrap();

    // P2 (HIGH) desaloja a P1 en t=1 y corre hasta terminar; P3 (LOW) corre último
    assert_eq!(
        result.timeline().slots(),
        &[
            TimeSlot::execution("P1", 0.0, 1.0),
            TimeSlot::execution("P2", 1.0, 4.0),
            TimeSlot::execution("P1", 4.0, 8.0),
            TimeSlot::execution("P3", 8.0, 9.0),
        ]
    );
    assert_eq!(result.context_switches(), 3);
    assert_eq!(process(&result, "P1").waiting_time(), Some(3.0));
    assert_eq!(process(&result, "P2").waiting_time(), Some(0.0));
    assert_eq!(process(&result, "P3").waiting_time(), Some(6.0));
    assert_eq!(process(&result, "P2").start_time, Some(1.0));
    assert_eq!(process(&result, "P3").start_time, Some(8.0));
}

#[test]
fn test_non_preemptive_priority_reference_scenario() {
    let result = Scheduler::new(0.0)
        .run(SchedulingPolicy::NonPreemptivePriority, reference_processes())
        .unwrap();

    // P1 ya corre cuando llega P2: la prioridad solo decide entre procesos listos
    assert_eq!(
        result.timeline().slots(),
        &[
            TimeSlot::execution("P1", 0.0, 5.0),
            TimeSlot::execution("P2", 5.0, 8.0),
            TimeSlot::execution("P3", 8.0, 9.0),
        ]
    );
    assert_eq!(result.context_switches(), 2);
}

#[test]
fn test_round_robin_reference_scenario() {
    let result = Scheduler::new(0.0)
        .run(SchedulingPolicy::round_robin(2.0), reference_processes())
        .unwrap();

    assert_eq!(
        result.timeline().slots(),
        &[
            TimeSlot::execution("P1", 0.0, 2.0),
            TimeSlot::execution("P2", 2.0, 4.0),
            TimeSlot::execution("P3", 4.0, 5.0),
            TimeSlot::execution("P1", 5.0, 7.0),
            TimeSlot::execution("P2", 7.0, 8.0),
            TimeSlot::execution("P1", 8.0, 9.0),
        ]
    );
    assert_eq!(result.context_switches(), 5);
}

#[test]
fn test_all_policies_complete_every_process() {
    for policy in SchedulingPolicy::all(2.0) {
        let result = Scheduler::new(0.0)
            .run(policy.clone(), reference_processes())
            .unwrap();

        assert!(
            result.processes().iter().all(Process::is_completed),
            "{} dejó procesos sin completar",
            policy
        );
        // Sin costo de cambio, el tiempo ocupado es la suma de ráfagas
        assert_eq!(result.timeline().busy_time(), 9.0, "{}", policy);
    }
}

#[test]
fn test_timeline_slots_are_ordered_and_positive() {
    for policy in SchedulingPolicy::all(2.0) {
        let result = Scheduler::new(0.5)
            .run(policy.clone(), reference_processes())
            .unwrap();

        let slots = result.timeline().slots();
        for slot in slots {
            assert!(slot.duration() > 0.0, "{}: intervalo vacío", policy);
        }
        for pair in slots.windows(2) {
            assert!(
                pair[1].start_time >= pair[0].end_time,
                "{}: intervalos solapados o desordenados",
                policy
            );
        }
    }
}

#[test]
fn test_round_robin_slots_bounded_by_quantum() {
    let processes = vec![
        Process::new("P1", 0.0, 7.0, Priority::Normal),
        Process::new("P2", 0.0, 4.0, Priority::Normal),
        Process::new("P3", 3.0, 5.0, Priority::Normal),
    ];
    let result = Scheduler::new(0.0)
        .run(SchedulingPolicy::round_robin(2.0), processes)
        .unwrap();

    for slot in result.timeline().slots() {
        assert!(slot.duration() <= 2.0 + 1e-9);
    }
}

#[test]
fn test_context_switch_cost_extends_makespan() {
    let result = Scheduler::new(0.5)
        .run(SchedulingPolicy::Fcfs, reference_processes())
        .unwrap();

    // 2 cambios de 0.5 insertados como huecos entre intervalos
    assert_eq!(result.context_switches(), 2);
    assert_eq!(result.context_switch_overhead(), 1.0);
    assert_eq!(result.total_time(), 10.0);
    assert_eq!(
        result.timeline().slots(),
        &[
            TimeSlot::execution("P1", 0.0, 5.0),
            TimeSlot::execution("P2", 5.5, 8.5),
            TimeSlot::execution("P3", 9.0, 10.0),
        ]
    );
}

#[test]
fn test_idle_gap_recorded_when_no_process_is_ready() {
    let processes = vec![
        Process::new("P1", 0.0, 2.0, Priority::Normal),
        Process::new("P2", 6.0, 1.0, Priority::Normal),
    ];
    let result = Scheduler::new(0.0)
        .run(SchedulingPolicy::Fcfs, processes)
        .unwrap();

    assert_eq!(
        result.timeline().slots(),
        &[
            TimeSlot::execution("P1", 0.0, 2.0),
            TimeSlot::idle(2.0, 6.0),
            TimeSlot::execution("P2", 6.0, 7.0),
        ]
    );
    // El hueco ocioso no genera cambio propio, pero P2 sí releva a P1
    assert_eq!(result.context_switches(), 1);
}

#[test]
fn test_runs_are_deterministic() {
    let scheduler = Scheduler::new(0.25);
    for policy in SchedulingPolicy::all(3.0) {
        let first = scheduler.run(policy.clone(), reference_processes()).unwrap();
        let second = scheduler.run(policy, reference_processes()).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_empty_scenario_produces_empty_result() {
    for policy in SchedulingPolicy::all(2.0) {
        let result = Scheduler::default().run(policy, Vec::new()).unwrap();
        assert!(result.timeline().is_empty());
        assert_eq!(result.total_time(), 0.0);
        assert_eq!(result.context_switches(), 0);
    }
}

#[test]
fn test_csv_scenario_end_to_end() {
    let csv = "Process_ID,Arrival_Time,CPU_Burst_Time,Priority\n\
               P1,0,5,NORMAL\n\
               P2,1,3,HIGH\n\
               P3,2,1,LOW\n";
    let processes = parse_csv(csv).unwrap();
    let result = Scheduler::new(0.0)
        .run(SchedulingPolicy::PreemptiveSjf, processes)
        .unwrap();

    // SJF preemptivo: P2 desaloja a P1 en t=1, P3 desaloja a P2 en t=2
    assert_eq!(
        result.timeline().slots(),
        &[
            TimeSlot::execution("P1", 0.0, 1.0),
            TimeSlot::execution("P2", 1.0, 2.0),
            TimeSlot::execution("P3", 2.0, 3.0),
            TimeSlot::execution("P2", 3.0, 5.0),
            TimeSlot::execution("P1", 5.0, 9.0),
        ]
    );

    let metrics = MetricsCalculator::new(vec![5.0, 9.0])
        .calculate(&result)
        .unwrap();
    assert_eq!(metrics.throughput_at(5.0), Some(2));
    assert_eq!(metrics.throughput_at(9.0), Some(3));
    assert_eq!(metrics.cpu_efficiency, 100.0);
}

#[test]
fn test_non_preemptive_sjf_orders_by_burst() {
    let result = Scheduler::new(0.0)
        .run(SchedulingPolicy::NonPreemptiveSjf, reference_processes())
        .unwrap();

    // Al terminar P1 están listos P2 (3) y P3 (1): gana la ráfaga más corta
    let order: Vec<&str> = result
        .timeline()
        .slots()
        .iter()
        .filter_map(TimeSlot::process_id)
        .collect();
    assert_eq!(order, vec!["P1", "P3", "P2"]);
}
