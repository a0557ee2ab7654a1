use symcompact::gs1::*;

// GS1-128 linear component width in modules
const LINEAR_WIDTH: usize = 189;

fn main() -> Result<(), symcompact::Error> {
    env_logger::init();

    // \x1d - FNC1 separating variable length AIs
    let inputs: [&[u8]; 3] = [
        b"1799123110LOT1",
        b"90123ABC\x1d21XYZ",
        b"21ABCDEFGHIJKLMNOPQRSTUVWXYZ\x1d2412345678901234567890\x1d4001234567890",
    ];

    let options = CompositeOptions::new().set_linear_width(LINEAR_WIDTH);
    for data in inputs {
        let symbol = encode_composite(data, &options)?;
        println!("{:?}: {:?} {}x{}, {} bits", String::from_utf8_lossy(data), symbol.kind,
            symbol.columns, symbol.rows, symbol.bits.len());
        println!("{}", symbol.bits);
        for row in symbol.codewords.chunks(symbol.columns) {
            println!("{row:?}");
        }
    }
    Ok(())
}
