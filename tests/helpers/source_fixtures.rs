//! Common Verilog fixtures for tests.

pub const BUFFER: &str = r#"
module buffer (
    input  wire a,
    output wire y
);
    assign y = a;
endmodule
"#;

pub const INVERTER: &str = r#"
module inverter (input wire a, output wire y);
    assign y = ~a;
endmodule
"#;

/// Instantiates `buffer` twice.
pub const MUX: &str = r#"
// 2:1 mux built from buffers
module mux_unit (
    input  wire a,
    input  wire b,
    input  wire sel,
    output wire y
);
    wire ya, yb;
    buffer buf_a (.a(a), .y(ya));
    buffer buf_b (.a(b), .y(yb));
    assign y = sel ? yb : ya;
endmodule
"#;

/// Instantiates `mux_unit` twice.
pub const MUX_TB: &str = r#"
module mux_unit_tb;
    reg a, b, sel;
    wire y0, y1;

    mux_unit dut0 (.a(a), .b(b), .sel(sel), .y(y0));
    mux_unit dut1 (.a(b), .b(a), .sel(sel), .y(y1));

    initial begin
        a = 0; b = 1; sel = 0;
        #10;
        if (y0 !== 0) $display("FAIL: y0");
        $finish;
    end
endmodule
"#;

pub const INVERTER_TB: &str = r#"
module inverter_tb;
    reg a;
    wire y;

    inverter uut (.a(a), .y(y));

    initial begin
        a = 0;
        #10;
        $finish;
    end
endmodule
"#;

/// Instantiates nothing; resolves through its file name only.
pub const BUFFER_TB_NO_INSTANCE: &str = r#"
module buffer_tb;
    initial begin
        $display("SUCCESS");
        $finish;
    end
endmodule
"#;

/// Instantiates a unit nobody declares.
pub const ORPHAN_TB: &str = r#"
module orphan_tb;
    missing_unit m0 (.a(1'b0));
endmodule
"#;
