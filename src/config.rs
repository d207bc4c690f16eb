use std::{env, net::{SocketAddr, ToSocketAddrs as _}};

use sea_orm::ConnectOptions;
use tracing::info;

pub struct Config {
    pub host_address: SocketAddr,

    pub database_opt: ConnectOptions,

    pub jwt_key: String,
}

pub fn load() -> Config {
    Config {
        host_address: load_host_address(),
        database_opt: required("DATABASE_URL").into(),
        jwt_key: required("JWT_SECRET"),
    }
}

fn load_host_address() -> SocketAddr {
    info!("Loading environment `HOST_ADDRESS`");

    let var = env::var("HOST_ADDRESS").unwrap_or_else(|_| "127.0.0.1:0".to_string());

    var.to_socket_addrs()
        .expect("`HOST_ADDRESS` is not in a valid format").nth(0)
        .expect("unable to resolve host from `HOST_ADDRESS`")
}

fn required(name: &str) -> String {
    info!("Loading environment `{name}`");

    env::var(name).unwrap_or_else(|_| panic!("Environment `{name}` is required to be set"))
}
