//! Writers for the instance and solution formats.

use std::fmt::Write;

use qroute_ir::{Instance, Operation, Solution};

/// Write an instance in the one-based text format.
pub fn emit_instance(instance: &Instance) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {} {} {}",
        instance.num_logical(),
        instance.num_gates(),
        instance.dependencies().len(),
        instance.num_physical(),
        instance.links().len()
    );
    for (id, gate) in instance.iter_gates() {
        let _ = writeln!(out, "{} {} {}", id.0 + 1, gate.a().0 + 1, gate.b().0 + 1);
    }
    for (i, edge) in instance.dependencies().iter().enumerate() {
        let _ = writeln!(
            out,
            "{} {} {}",
            i + 1,
            edge.producer.0 + 1,
            edge.consumer.0 + 1
        );
    }
    for (i, (p, q)) in instance.links().iter().enumerate() {
        let _ = writeln!(out, "{} {} {}", i + 1, p.0 + 1, q.0 + 1);
    }
    out
}

/// Write a solution: the initial mapping followed by the operation stream.
pub fn emit_solution(solution: &Solution) -> String {
    let mut out = String::new();
    for (logical, physical) in solution.placement() {
        let _ = writeln!(out, "{} {}", logical.0 + 1, physical.0 + 1);
    }
    for op in &solution.operations {
        let _ = writeln!(out, "{}", emit_operation(op));
    }
    out
}

/// Write one operation line, without the newline.
pub fn emit_operation(op: &Operation) -> String {
    let [a, b] = op.qubits();
    format!("{} q{} q{}", op.kind(), a.0 + 1, b.0 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qroute_ir::{Gate, LogicalQubit, PhysicalQubit};

    #[test]
    fn test_emit_instance() {
        let mut instance = Instance::new(3);
        let g0 = instance.add_gate(Gate::new(LogicalQubit(0), LogicalQubit(1)).unwrap());
        let g1 = instance.add_gate(Gate::new(LogicalQubit(2), LogicalQubit(0)).unwrap());
        instance.add_dependency(g0, g1);
        instance.add_link(PhysicalQubit(0), PhysicalQubit(1));
        instance.add_link(PhysicalQubit(1), PhysicalQubit(2));

        assert_eq!(
            emit_instance(&instance),
            "3 2 1 3 2\n1 1 2\n2 3 1\n1 1 2\n1 1 2\n2 2 3\n"
        );
    }

    #[test]
    fn test_emit_operation_keeps_operand_order() {
        let op = Operation::Cnot(LogicalQubit(4), LogicalQubit(1));
        assert_eq!(emit_operation(&op), "CNOT q5 q2");
    }

    #[test]
    fn test_emit_empty_solution() {
        let solution = Solution::new(vec![PhysicalQubit(1), PhysicalQubit(0)], vec![]);
        assert_eq!(emit_solution(&solution), "1 2\n2 1\n");
    }
}
