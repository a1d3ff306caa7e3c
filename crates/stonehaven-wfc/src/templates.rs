//! Built-in grass/water catalog.
//!
//! Ten modules: both centers, four grass edges and four grass corners. The
//! edge/corner direction names the side where water lies.

use stonehaven_common::Direction::{East, North, South, West};

use crate::catalog::Catalog;
use crate::module::{Category, TileModule};
use crate::sockets::SocketDeriver;

const G: &str = "grass_center";
const W: &str = "water_center";
const EN: &str = "grass_edge_n";
const EE: &str = "grass_edge_e";
const ES: &str = "grass_edge_s";
const EW: &str = "grass_edge_w";
const CNE: &str = "grass_corner_ne";
const CNW: &str = "grass_corner_nw";
const CSE: &str = "grass_corner_se";
const CSW: &str = "grass_corner_sw";

fn module(id: &str, category: Category) -> TileModule {
    TileModule::new(id, category).with_tile(format!("terrain/{id}"))
}

/// The grass/water modules with no adjacency. Run a [`SocketDeriver`] over
/// them (or use [`grass_water_derived`]) before solving.
#[must_use]
pub fn grass_water() -> Catalog {
    Catalog::new(vec![
        module(G, Category::Center),
        module(W, Category::Center),
        module(EN, Category::Edge),
        module(EE, Category::Edge),
        module(ES, Category::Edge),
        module(EW, Category::Edge),
        module(CNE, Category::Corner),
        module(CNW, Category::Corner),
        module(CSE, Category::Corner),
        module(CSW, Category::Corner),
    ])
}

/// The grass/water modules with sockets and adjacency derived from their ids.
#[must_use]
pub fn grass_water_derived() -> Catalog {
    let mut catalog = grass_water();
    SocketDeriver::default().derive(&mut catalog.modules);
    catalog
}

/// The grass/water modules with hand-authored adjacency lists.
///
/// The lists are not symmetric. `grass_edge_n` lists `grass_corner_ne` to its
/// east, but the corner lists only `grass_edge_e` to its west. A pair is
/// compatible only when both sides list each other, so shorelines such as a
/// north edge closed by `grass_corner_ne` cannot be built from these rules.
/// The derived catalog accepts them.
#[must_use]
pub fn grass_water_authored() -> Catalog {
    Catalog::new(vec![
        module(G, Category::Center)
            .allow(North, &[G, EN, CNE, CNW])
            .allow(East, &[G, EE, CNE, CSE])
            .allow(South, &[G, ES, CSE, CSW])
            .allow(West, &[G, EW, CNW, CSW]),
        module(W, Category::Center)
            .allow(North, &[W, ES, CSE, CSW])
            .allow(East, &[W, EW, CSW, CNW])
            .allow(South, &[W, EN, CNE, CNW])
            .allow(West, &[W, EE, CNE, CSE]),
        module(EN, Category::Edge)
            .allow(North, &[W])
            .allow(East, &[EN, CNE])
            .allow(South, &[G, EN, CNE, CNW])
            .allow(West, &[EN, CNW]),
        module(EE, Category::Edge)
            .allow(North, &[EE, CNE])
            .allow(East, &[W])
            .allow(South, &[EE, CSE])
            .allow(West, &[G, EE, CNE, CSE]),
        module(ES, Category::Edge)
            .allow(North, &[G, ES, CSE, CSW])
            .allow(East, &[ES, CSE])
            .allow(South, &[W])
            .allow(West, &[ES, CSW]),
        module(EW, Category::Edge)
            .allow(North, &[EW, CNW])
            .allow(East, &[G, EW, CNW, CSW])
            .allow(South, &[EW, CSW])
            .allow(West, &[W]),
        module(CNE, Category::Corner)
            .allow(North, &[W])
            .allow(East, &[W])
            .allow(South, &[G, EN, CSE])
            .allow(West, &[G, EE, CNW]),
        module(CNW, Category::Corner)
            .allow(North, &[W])
            .allow(East, &[G, EW, CNE])
            .allow(South, &[G, EN, CSW])
            .allow(West, &[W]),
        module(CSE, Category::Corner)
            .allow(North, &[G, ES, CNE])
            .allow(East, &[W])
            .allow(South, &[W])
            .allow(West, &[G, EE, CSW]),
        module(CSW, Category::Corner)
            .allow(North, &[G, ES, CNW])
            .allow(East, &[G, EW, CSE])
            .allow(South, &[W])
            .allow(West, &[W]),
    ])
}
