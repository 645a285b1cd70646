use clap::Parser;
use rustchip_setup::ManualSetupPayloadParser;

#[derive(Parser, Debug)]
#[command(name = "chip-parsecode")]
struct Args {
    /// Manual pairing code digits; `-` and spaces are ignored.
    code: String,
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let code: String = args
        .code
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();

    match ManualSetupPayloadParser::new(&code).populate_payload() {
        Ok(payload) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("discriminator:  {}", payload.discriminator);
                println!("setup PIN code: {}", payload.setup_pin_code);
                println!("custom flow:    {}", payload.requires_custom_flow);
                if payload.requires_custom_flow {
                    println!("vendor id:      0x{:04X}", payload.vendor_id);
                    println!("product id:     0x{:04X}", payload.product_id);
                }
            }
        }
        Err(e) => {
            eprintln!("parse failed: {e}");
            std::process::exit(1);
        }
    }
    Ok(())
}
