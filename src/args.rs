use clap::Parser;
use super::constants::*;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
  // -H MySql/MariaDB host
  #[clap(short = 'H', long, value_parser, default_value_t = String::new() )]
  pub host: String,
  // -P MySql/MariaDB port, 0 falls back to db_port or the default
  #[clap(short = 'P', long, value_parser, default_value_t = 0 )]
  pub port: u16,
  // -d MySql/MariaDB database name
  #[clap(short, long, value_parser, default_value_t = String::new() )]
  pub db: String,
  // -u MySql/MariaDB user name
  #[clap(short, long, value_parser, default_value_t = String::new() )]
  pub user: String,
  // -p MySql/MariaDB password
  #[clap(short, long, value_parser, default_value_t = String::new() )]
  pub pass: String,
  // -w web service port
  #[clap(short, long, value_parser, default_value_t = WEB_PORT_DEFAULT )]
  pub webport: u16,
  // -b web service bind address
  #[clap(short, long, value_parser, default_value_t = WEB_HOST_DEFAULT.to_string() )]
  pub bind: String,
  // company phone number receiving order relays
  #[clap(long, value_parser, default_value_t = String::new() )]
  pub whatsapp_phone: String,
  // create missing tables on startup
  #[clap(long, value_parser, default_value_t = false )]
  pub init_schema: bool,
}

pub fn match_env_or(arg_var: &str, env_key: &str, default: &str) -> String {
  if arg_var.len() < 1 {
    dotenv::var(env_key).unwrap_or(default.to_string())
  } else {
    arg_var.to_string()
  }
}

pub fn match_whatsapp_phone(args: &Args) -> String {
  let phone = match_env_or(&args.whatsapp_phone, "whatsapp_phone", WHATSAPP_PHONE_DEFAULT);
  phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_whatsapp_phone_keeps_digits_only() {
    let args = Args::parse_from(["freshcart", "--whatsapp-phone", "+90 534 822 88 65"]);
    assert_eq!(match_whatsapp_phone(&args), "905348228865");
  }

  #[test]
  fn test_defaults() {
    let args = Args::parse_from(["freshcart"]);
    assert_eq!(args.webport, WEB_PORT_DEFAULT);
    assert_eq!(args.bind, WEB_HOST_DEFAULT);
    assert!(!args.init_schema);
  }
}
