use super::cli::{OutputFormat, OutputOptions};
use super::error::CliError;
use lcao::{DensityKind, EnergyReport, NormalizationReport, State};
use prettytable::*;
use serde::Serialize;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// A printed Laplacian expression of one state.
#[derive(Serialize)]
pub struct DerivedLaplacian {
    pub state: State,
    pub expression: String,
}

pub fn get_writer(output_path: &Option<PathBuf>) -> Result<Box<dyn Write>, CliError> {
    match output_path {
        Some(path) => {
            let file = std::fs::File::create(path).map_err(|e| CliError::Io {
                path: path.clone(),
                source: e,
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

pub fn write_energies(
    mut writer: Box<dyn Write>,
    reports: &[EnergyReport],
    output: &OutputOptions,
) -> Result<(), CliError> {
    let precision = output.precision;
    match output.format {
        OutputFormat::Pretty => {
            write_title(&mut writer, "Energy Expectation Values")?;
            let mut table = Table::new();
            table.set_format(box_format());
            table.set_titles(row![
                bc->"State", bc->"Energy (eV)", bc->"Error (eV)", bc->"Energy (J)", bc->"Converged", bc->"Evaluations"
            ]);
            for report in reports {
                table.add_row(row![
                    l->report.state,
                    r->format!("{:.prec$}", report.energy_ev, prec = precision),
                    r->format!("{:.2e}", report.error_ev),
                    r->format!("{:.prec$e}", report.energy_joule, prec = precision),
                    c->yes_no(report.converged),
                    r->report.evaluations
                ]);
            }
            table.print(&mut writer)?;
            if let Some(report) = reports.first() {
                writeln!(writer, "Laplacian: {}", report.laplacian)?;
            }
        }
        OutputFormat::Plain => write_energies_plain(&mut writer, reports, precision)?,
        OutputFormat::Json => write_json(&mut writer, reports)?,
    }
    writer.flush()?;
    Ok(())
}

pub fn write_normalizations(
    mut writer: Box<dyn Write>,
    reports: &[NormalizationReport],
    output: &OutputOptions,
) -> Result<(), CliError> {
    let precision = output.precision;
    let raw = reports.iter().any(|r| r.kind == DensityKind::Raw);
    match output.format {
        OutputFormat::Pretty => {
            let title = if raw {
                "Probability Density Integrals (without normalization)"
            } else {
                "Probability Density Integrals"
            };
            write_title(&mut writer, title)?;
            let mut table = Table::new();
            table.set_format(box_format());
            if raw {
                table.set_titles(row![
                    bc->"State", bc->"Integral", bc->"Error", bc->"Implied c", bc->"Configured c", bc->"Converged"
                ]);
            } else {
                table.set_titles(row![bc->"State", bc->"Integral", bc->"Error", bc->"c", bc->"Converged"]);
            }
            for report in reports {
                let mut cells = row![
                    l->report.state,
                    r->format!("{:.prec$}", report.integral, prec = precision),
                    r->format!("{:.2e}", report.error)
                ];
                if raw {
                    let implied = report
                        .implied_normalization
                        .map(|c| format!("{:.prec$}", c, prec = precision))
                        .unwrap_or_else(|| "n/a".to_string());
                    cells.add_cell(cell!(r->implied));
                }
                cells.add_cell(cell!(r->report.configured_normalization));
                cells.add_cell(cell!(c->yes_no(report.converged)));
                table.add_row(cells);
            }
            table.print(&mut writer)?;
        }
        OutputFormat::Plain => {
            for (i, report) in reports.iter().enumerate() {
                if i > 0 {
                    writeln!(writer)?;
                }
                let suffix = if raw { " (without normalization)" } else { "" };
                writeln!(
                    writer,
                    "Integral of the {} State's Probability Density Function{}: ",
                    capitalized(report.state),
                    suffix
                )?;
                writeln!(writer, "{:.prec$}", report.integral, prec = precision)?;
                writeln!(writer, "Error estimate: ")?;
                writeln!(writer, "{:.2e}", report.error)?;
                if let Some(implied) = report.implied_normalization {
                    writeln!(writer, "Implied normalization constant: ")?;
                    writeln!(writer, "{:.prec$}", implied, prec = precision)?;
                }
                write_convergence_warning(&mut writer, report.converged)?;
            }
        }
        OutputFormat::Json => write_json(&mut writer, reports)?,
    }
    writer.flush()?;
    Ok(())
}

pub fn write_laplacians(
    mut writer: Box<dyn Write>,
    derived: &[DerivedLaplacian],
    output: &OutputOptions,
) -> Result<(), CliError> {
    match output.format {
        OutputFormat::Pretty | OutputFormat::Plain => {
            for (i, laplacian) in derived.iter().enumerate() {
                if i > 0 {
                    writeln!(writer)?;
                }
                writeln!(
                    writer,
                    "Laplacian of the {} State: ",
                    capitalized(laplacian.state)
                )?;
                writeln!(writer, "{}", laplacian.expression)?;
            }
        }
        OutputFormat::Json => write_json(&mut writer, derived)?,
    }
    writer.flush()?;
    Ok(())
}

fn write_energies_plain(
    writer: &mut dyn Write,
    reports: &[EnergyReport],
    precision: usize,
) -> Result<(), CliError> {
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            writeln!(writer)?;
        }
        writeln!(
            writer,
            "Energy Expectation Value of the {} State (eV): ",
            capitalized(report.state)
        )?;
        writeln!(writer, "{:.prec$}", report.energy_ev, prec = precision)?;
        writeln!(writer, "Error estimate (eV): ")?;
        writeln!(writer, "{:.2e}", report.error_ev)?;
        write_convergence_warning(writer, report.converged)?;
    }
    Ok(())
}

fn write_convergence_warning(writer: &mut dyn Write, converged: bool) -> Result<(), CliError> {
    if !converged {
        writeln!(
            writer,
            "Warning: the integral did not converge within the subdivision limit"
        )?;
    }
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

fn write_title(writer: &mut dyn Write, title: &str) -> Result<(), CliError> {
    let mut title_table = Table::new();
    title_table.set_format(box_format());
    title_table.add_row(row![bc->title]);
    title_table.print(writer)?;
    writeln!(writer)?;
    Ok(())
}

fn box_format() -> format::TableFormat {
    format::FormatBuilder::new()
        .column_separator('│')
        .borders('│')
        .separators(
            &[format::LinePosition::Top],
            format::LineSeparator::new('─', '┬', '╭', '╮'),
        )
        .separators(
            &[format::LinePosition::Title],
            format::LineSeparator::new('═', '╪', '╞', '╡'),
        )
        .separators(
            &[format::LinePosition::Intern],
            format::LineSeparator::new('─', '┼', '├', '┤'),
        )
        .separators(
            &[format::LinePosition::Bottom],
            format::LineSeparator::new('─', '┴', '╰', '╯'),
        )
        .padding(1, 1)
        .build()
}

fn capitalized(state: State) -> &'static str {
    match state {
        State::Bonding => "Bonding",
        State::Antibonding => "Antibonding",
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcao::LaplacianMethod;

    fn report(state: State, converged: bool) -> EnergyReport {
        EnergyReport {
            state,
            laplacian: LaplacianMethod::Analytic,
            energy_ev: -28.696,
            error_ev: 1.5e-5,
            energy_joule: -4.6e-18,
            converged,
            evaluations: 3375,
        }
    }

    #[test]
    fn test_plain_energies_include_error_estimate() {
        let mut buffer = Vec::new();
        write_energies_plain(&mut buffer, &[report(State::Bonding, true)], 3).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("Energy Expectation Value of the Bonding State (eV): \n-28.696\n"));
        assert!(text.contains("Error estimate (eV): \n1.50e-5\n"));
        assert!(!text.contains("Warning"));
    }

    #[test]
    fn test_plain_energies_flag_non_convergence() {
        let mut buffer = Vec::new();
        let reports = [report(State::Bonding, true), report(State::Antibonding, false)];
        write_energies_plain(&mut buffer, &reports, 3).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let (bonding, antibonding) = text.split_once("\n\n").unwrap();
        assert!(!bonding.contains("Warning"));
        assert!(antibonding.contains("did not converge"));
    }
}
