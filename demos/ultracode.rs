use symcompact::ultra::*;

const ECC_LEVEL: u8 = 3;

fn main() -> Result<(), symcompact::Error> {
    // RUST_LOG=trace shows the mode chosen for every character
    env_logger::init();

    let options = UltraOptions::new().set_ecc_level(ECC_LEVEL);
    let symbol = encode_ultracode(b"https://www.example.com/Products?id=1234", &options)?;

    println!("{} rows x {} columns, EC{}", symbol.rows, symbol.columns, symbol.ecc_level);
    println!("data: {:?}", symbol.data_codewords);
    println!("check: {:?}", symbol.ecc_codewords);
    for row in symbol.codewords.chunks(symbol.columns) {
        println!("{}", row.iter().map(|cw| format!("{cw:3}")).collect::<Vec<_>>().join(" "));
    }
    Ok(())
}
