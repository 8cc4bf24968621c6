// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod catalog;
mod cli;
mod comparison;
mod console_format;
mod error;
mod session;
mod types;
mod ui;

use catalog::Catalog;
use cli::{CliArgs, Command, ShowArgs, ViewArgs};
use console_format::TableWriter;
use error::{CatalogError, CliError};
use log::debug;
use session::ComparisonSession;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use types::{Facet, SortKey, TenderConfig};

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = CliArgs::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    // Set console width override if specified (for testing)
    if let Some(width) = args.console_width {
        console_format::set_console_width(width);
    }

    if let Err(e) = run(&args) {
        ui::print_error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}

fn run(args: &CliArgs) -> Result<(), CliError> {
    let source = catalog::resolve_catalog_source(args.catalog.as_deref());
    let catalog = Catalog::load(&source)?;
    debug!("Catalogue: {} ({} tenders)", source.describe(), catalog.tenders.len());

    let use_colors = args.use_colors();

    match &args.command {
        Command::List => {
            console_format::print_catalog(&catalog, use_colors);
            Ok(())
        }
        Command::Show(show) => run_show(find_tender(&catalog, &show.slug)?, show, use_colors),
        Command::Supplier { slug, id, facet } => {
            let tender = find_tender(&catalog, slug)?;
            let supplier = tender
                .supplier(id)
                .ok_or_else(|| CatalogError::SupplierNotFound { slug: slug.clone(), id: id.clone() })?;
            let session = open_session(tender, SortKey::default(), *facet);
            let categories = session.ordered_categories();

            let mut writer = TableWriter::new(io::stdout().lock(), use_colors);
            writer.write_supplier_details(tender, supplier, &categories, *facet)?;
            Ok(())
        }
        Command::Fields { slug } => {
            console_format::print_key_fields(find_tender(&catalog, slug)?, use_colors);
            Ok(())
        }
        Command::Export { slug, view, output } => run_export(find_tender(&catalog, slug)?, view, output.as_deref()),
        Command::Validate => {
            let findings = catalog::validate(&catalog);
            for (slug, key) in &findings {
                ui::print_warning(&format!(
                    "{}: field '{}' in '{}' has no value for any supplier",
                    slug, key.key, key.category
                ));
            }
            ui::status(&format!(
                "{}: {} tenders, {} unresolved field keys",
                source.describe(),
                catalog.tenders.len(),
                findings.len()
            ));
            Ok(())
        }
    }
}

/// Resolve a tender slug, listing the known slugs when it is missing
fn find_tender<'c>(catalog: &'c Catalog, slug: &str) -> Result<&'c TenderConfig, CatalogError> {
    catalog.get(slug).inspect_err(|_| {
        ui::status(&format!("available tenders: {}", catalog.slugs().join(", ")));
    })
}

/// Session with sort and facet applied; the facet only resets expansion when it changes
fn open_session(tender: &TenderConfig, sort: SortKey, facet: Facet) -> ComparisonSession<'_> {
    let mut session = ComparisonSession::new(tender);
    session.set_sort(sort);
    if facet != session.facet() {
        session.set_facet(facet);
    }
    session
}

/// What `show --json` prints
#[derive(serde::Serialize)]
struct ScenarioView<'a> {
    slug: &'a str,
    title: &'a str,
    sort: SortKey,
    facet: Facet,
    expanded: Vec<&'a str>,
    compare_button_visible: bool,
    table: comparison::ComparisonTable,
}

fn run_show(tender: &TenderConfig, show: &ShowArgs, use_colors: bool) -> Result<(), CliError> {
    let mut session = open_session(tender, show.view.sort, show.view.facet);
    session.on_scroll(show.scroll);
    if show.collapse_all {
        session.collapse_all();
    }
    if show.expand_all {
        session.expand_all();
    }
    for name in &show.expand {
        if !tender.categories.iter().any(|c| &c.name == name) {
            ui::print_warning(&format!("no category named '{}' in {}", name, tender.slug));
        }
        session.toggle_category(name);
    }

    let table = session.table();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if show.json {
        let view = ScenarioView {
            slug: &tender.slug,
            title: &tender.title,
            sort: session.sort_key(),
            facet: session.facet(),
            expanded: session.expanded().names().collect(),
            compare_button_visible: session.compare_button_visible(),
            table,
        };
        serde_json::to_writer_pretty(&mut out, &view)?;
        writeln!(out)?;
        return Ok(());
    }

    let suppliers = session.sorted_suppliers();
    let categories = session.ordered_categories();

    let mut writer = TableWriter::new(out, use_colors);
    writer.write_scenario_header(tender)?;
    writer.write_overview(&tender.overview, show.details)?;
    if session.compare_button_visible() {
        writer.write_compare_shortcut(suppliers.len())?;
    }
    writer.write_supplier_cards(tender, &suppliers, &categories, session.facet())?;
    writer.write_comparison_table(&table)?;
    Ok(())
}

fn run_export(tender: &TenderConfig, view: &ViewArgs, output: Option<&Path>) -> Result<(), CliError> {
    let session = open_session(tender, view.sort, view.facet);
    let text = session.export_csv()?;

    let path = output.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(session.export_file_name()));
    comparison::write_export(&path, &text)?;

    ui::status(&format!(
        "Exported {} suppliers across {} categories to {}",
        tender.suppliers.len(),
        tender.categories.len(),
        path.display()
    ));
    Ok(())
}
