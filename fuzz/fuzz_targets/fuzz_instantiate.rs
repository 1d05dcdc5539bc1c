#![no_main]
use libfuzzer_sys::fuzz_target;
use ocelot_ir::expr::Expr;
use ocelot_ir::symbols::SymbolTable;

// Builds a property from the input bytes, one opcode per byte.
fn decode(data: &mut &[u8], depth: usize) -> Expr {
    let Some((&op, rest)) = data.split_first() else {
        return Expr::bool_symbol("a");
    };
    *data = rest;
    if depth > 6 {
        return Expr::bool_symbol(if op & 1 == 0 { "a" } else { "b" });
    }
    let d = depth + 1;
    let small = u64::from(op >> 5);
    match op % 16 {
        0 => Expr::bool_symbol("a"),
        1 => Expr::bool_symbol("b"),
        2 => Expr::not(decode(data, d)),
        3 => Expr::and(vec![decode(data, d), decode(data, d)]),
        4 => Expr::past(decode(data, d), small),
        5 => Expr::always(decode(data, d)),
        6 => Expr::s_eventually(decode(data, d)),
        7 => Expr::ranged_eventually(small, small + 2, decode(data, d)),
        8 => Expr::until(decode(data, d), decode(data, d)),
        9 => Expr::s_until_with(decode(data, d), decode(data, d)),
        10 => Expr::cycle_delay_range(small, small + 1, decode(data, d)),
        11 => Expr::sequence_concat(decode(data, d), decode(data, d)),
        12 => Expr::overlapped_implication(decode(data, d), decode(data, d)),
        13 => Expr::non_overlapped_implication(decode(data, d), decode(data, d)),
        14 => Expr::cycle_delay_unbounded(small, decode(data, d)),
        _ => Expr::globally(Expr::ltl_eventually(decode(data, d))),
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&bound, mut rest)) = data.split_first() else {
        return;
    };
    let bound = u32::from(bound % 8);
    let expr = decode(&mut rest, 0);
    let symbols = SymbolTable::new();
    if let Ok(flat) = ocelot_unroll::instantiate(&expr, 0u32, bound, &symbols) {
        assert!(flat.is_flat());
        let _ = ocelot_smt::encoder::ExprEncoder::new(&symbols).encode(&flat);
    }
});
