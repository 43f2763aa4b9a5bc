//! Testbench skeleton generation.
//!
//! Pure text: nothing here reads the source tree or the index.

use crate::error::{Error, Result};

/// Port names for `count` inputs: `a, b, c` up to three, else `in0, in1, ...`.
pub fn input_names(count: usize) -> Vec<String> {
    if count <= 3 {
        (0..count)
            .map(|i| char::from(b'a' + i as u8).to_string())
            .collect()
    } else {
        (0..count).map(|i| format!("in{i}")).collect()
    }
}

/// Port names for `count` outputs: `y` for one, else `out0, out1, ...`.
pub fn output_names(count: usize) -> Vec<String> {
    if count == 1 {
        vec!["y".to_string()]
    } else {
        (0..count).map(|i| format!("out{i}")).collect()
    }
}

/// Generate a self-checking testbench for `unit`.
///
/// The testbench instantiates `unit` as `uut`, drives the inputs from a
/// `run_test` task, prints `FAIL: ...` on a mismatch of the first output and
/// dumps waveforms to `temp/<unit>.vcd`.
pub fn generate_testbench(unit: &str, inputs: usize, outputs: usize) -> Result<String> {
    if unit.is_empty() {
        return Err(Error::InvalidTemplate("unit name is empty".to_string()));
    }
    if inputs == 0 || outputs == 0 {
        return Err(Error::InvalidTemplate(format!(
            "need at least one input and one output, got {inputs} and {outputs}"
        )));
    }

    let ins = input_names(inputs);
    let outs = output_names(outputs);
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("module {unit}_tb;"));
    lines.push("    // Inputs".to_string());
    lines.extend(ins.iter().map(|i| format!("    reg {i};")));
    lines.push(String::new());
    lines.push("    // Outputs".to_string());
    lines.extend(outs.iter().map(|o| format!("    wire {o};")));
    lines.push(String::new());

    lines.push("    // Instantiate the Unit Under Test (UUT)".to_string());
    lines.push(format!("    {unit} uut ("));
    let ports: Vec<String> = ins
        .iter()
        .chain(outs.iter())
        .map(|p| format!("        .{p}({p})"))
        .collect();
    lines.push(ports.join(",\n"));
    lines.push("    );".to_string());
    lines.push(String::new());

    lines.push("    // Test vectors".to_string());
    lines.push("    reg [31:0] test_count = 0;".to_string());
    lines.push("    reg [31:0] error_count = 0;".to_string());
    lines.push(String::new());
    lines.push("    // Test task".to_string());
    lines.push("    task run_test;".to_string());
    lines.push(format!("        input [{}:0] test_inputs;", inputs - 1));
    lines.push(format!("        input [{}:0] expected_output;", outputs - 1));
    lines.push("        input [8*32:1] test_name;".to_string());
    lines.push("        begin".to_string());
    lines.push("            // Apply inputs".to_string());
    lines.extend(
        ins.iter()
            .enumerate()
            .map(|(bit, i)| format!("            {i} = test_inputs[{bit}];")),
    );
    lines.push("            #10; // Wait for propagation".to_string());
    lines.push(String::new());
    lines.push("            // Check output".to_string());
    lines.push(format!(
        "            if ({} !== expected_output[0]) begin",
        outs[0]
    ));
    lines.push(format!(
        concat!(
            "                $display(\"FAIL: %s - Expected %b, got %b\", ",
            "test_name, expected_output, {});"
        ),
        outs[0]
    ));
    lines.push("                error_count = error_count + 1;".to_string());
    lines.push("            end".to_string());
    lines.push("            test_count = test_count + 1;".to_string());
    lines.push("        end".to_string());
    lines.push("    endtask".to_string());
    lines.push(String::new());

    lines.push("    // Test stimulus".to_string());
    lines.push("    initial begin".to_string());
    lines.push(format!("        $dumpfile(\"temp/{unit}.vcd\");"));
    lines.push(format!("        $dumpvars(0, {unit}_tb);"));
    lines.push(String::new());
    lines.push("        // Initialize".to_string());
    lines.push("        error_count = 0;".to_string());
    lines.push("        test_count = 0;".to_string());
    lines.push(String::new());
    lines.push("        // Run tests".to_string());
    for (vector, expected, case) in [
        ("2'b00", "1'b1", 1),
        ("2'b01", "1'b1", 2),
        ("2'b10", "1'b1", 3),
        ("2'b11", "1'b0", 4),
    ] {
        lines.push(format!(
            "        run_test({vector}, {expected}, \"Test case {case}\");"
        ));
    }
    lines.push(String::new());
    lines.push("        // Report results".to_string());
    lines.push("        if (error_count == 0) begin".to_string());
    lines.push("            $display(\"SUCCESS: All %d tests passed!\", test_count);".to_string());
    lines.push("        end else begin".to_string());
    lines.push(
        "            $display(\"FAILURE: %d/%d tests failed\", error_count, test_count);"
            .to_string(),
    );
    lines.push("        end".to_string());
    lines.push(String::new());
    lines.push("        $finish;".to_string());
    lines.push("    end".to_string());
    lines.push("endmodule".to_string());

    let mut text = lines.join("\n");
    text.push('\n');
    Ok(text)
}
