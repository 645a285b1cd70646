use clap::Parser;
use rustchip_setup::{ManualSetupPayloadGenerator, SetupPayload};
use rustchip_tools::parse_int;

#[derive(Parser, Debug)]
#[command(name = "chip-manualcode")]
struct Args {
    #[arg(long, value_parser = parse_int::<u32>)]
    pin: u32,
    #[arg(long, value_parser = parse_int::<u16>)]
    discriminator: u16,
    #[arg(long, value_parser = parse_int::<u16>, default_value = "0")]
    vendor_id: u16,
    #[arg(long, value_parser = parse_int::<u16>, default_value = "0")]
    product_id: u16,
    #[arg(long)]
    custom_flow: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let payload = SetupPayload {
        vendor_id: args.vendor_id,
        product_id: args.product_id,
        requires_custom_flow: args.custom_flow,
        discriminator: args.discriminator,
        setup_pin_code: args.pin,
    };

    match ManualSetupPayloadGenerator::new(payload).payload_decimal_string_representation() {
        Ok(code) => println!("{code}"),
        Err(e) => {
            eprintln!("encode failed: {e}");
            std::process::exit(1);
        }
    }
}
