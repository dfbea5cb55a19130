pub const MYSQL_HOST_DEFAULT: &'static str = "127.0.0.1";
pub const MYSQL_PORT_DEFAULT: u16 = 3306;
pub const MYSQL_DB_DEFAULT: &'static str = "freshcart";
pub const MYSQL_USER_DEFAULT: &'static str = "freshcart";
pub const MYSQL_PASS_DEFAULT: &'static str = "";

pub const WEB_HOST_DEFAULT: &'static str = "127.0.0.1";
pub const WEB_PORT_DEFAULT: u16 = 8089;

// Company line receiving order relays
pub const WHATSAPP_PHONE_DEFAULT: &'static str = "905348228865";

pub const ADMIN_ROLE: &'static str = "admin";

pub const HEADER_USER_ID: &'static str = "x-user-id";
pub const HEADER_USER_ROLE: &'static str = "x-user-role";
pub const HEADER_USER_NAME: &'static str = "x-user-name";
pub const HEADER_USER_EMAIL: &'static str = "x-user-email";
pub const HEADER_USER_PHONE: &'static str = "x-user-phone";

pub const UNSPECIFIED: &'static str = "Belirtilmemiş";
