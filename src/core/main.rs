#![deny(clippy::all)]

#[macro_use]
extern crate log;

use simplelog::LevelFilter;
use simplelog::SimpleLogger;

use winsys::xdata::xconnection::XConnection;
pub use winsys::Result;

use anyhow::Context;

#[macro_use]
mod defaults;

mod binding;
mod common;
mod error;
mod focus;
mod model;
mod monitor;
mod pager;
mod slot;
mod topology;
mod util;

#[cfg(test)]
mod testing;

use binding::KeyBindings;
use model::Model;
use util::Util;

use winsys::connection::Connection;

pub fn main() -> Result<()> {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    SimpleLogger::init(level, simplelog::Config::default())?;

    let (conn, screen_num) = x11rb::connect(None)
        .map_err(|err| {
            error!("unable to connect to the display server: {}", err);
            err
        })
        .context("cannot open display")?;

    let xconn = XConnection::new(&conn, screen_num, defaults::FONT)?;
    Util::ignore_child_exit()?;

    Model::new(&xconn, KeyBindings::default()).run();

    xconn.cleanup();
    info!("exiting {}", WM_NAME!());

    Ok(())
}
