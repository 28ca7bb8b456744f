use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use amortization_core::amortization::{self, LoanInput, CURRENCY_DP};
use amortization_core::export::{xlsx, DEFAULT_XLSX_FILE_NAME};
use amortization_core::rate_lookup::{lookup_usury_rate, UsuryRate, DEFAULT_USURY_RATE_URL};

use crate::output::currency::format_percent;
use crate::output::table::{render_schedule, render_summary};

// Input bounds and defaults offered by the calculator.
const MIN_RATE_PERCENT: Decimal = dec!(0.01);
const MAX_RATE_PERCENT: Decimal = dec!(100);
const MIN_PRINCIPAL: Decimal = dec!(1);
const MAX_TERM_MONTHS: u32 = 360;
const DEFAULT_RATE_PERCENT: Decimal = dec!(12.5);
const DEFAULT_PRINCIPAL: Decimal = dec!(10000);
const DEFAULT_TERM_MONTHS: u32 = 12;

/// Arguments for the question-and-answer calculator
#[derive(Args)]
pub struct InteractiveArgs {
    /// Look up the published usury rate and show it as a reference
    #[arg(long)]
    pub lookup_rate: bool,

    /// Page to read the usury rate from
    #[arg(long, env = "AMORT_USURY_RATE_URL", default_value = DEFAULT_USURY_RATE_URL)]
    pub url: String,

    /// Directory the workbook is saved in
    #[arg(long, default_value = ".")]
    pub save_dir: PathBuf,
}

/// Reference value shown before the rate question.
pub enum RateReference {
    NotRequested,
    Found(UsuryRate),
    Unavailable,
}

#[derive(Debug)]
pub struct SessionOutcome {
    pub loan: LoanInput,
    pub computed: bool,
    pub saved_to: Option<PathBuf>,
}

pub fn run_interactive(args: InteractiveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let reference = if args.lookup_rate {
        lookup_usury_rate(&args.url).map_or(RateReference::Unavailable, RateReference::Found)
    } else {
        RateReference::NotRequested
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(stdin.lock(), stdout.lock());
    session.run(&reference, &args.save_dir)?;
    Ok(())
}

/// Prompt loop over any reader/writer pair.
pub struct Session<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Session { reader, writer }
    }

    pub fn run(&mut self, reference: &RateReference, save_dir: &Path) -> io::Result<SessionOutcome> {
        writeln!(self.writer, "Calculadora de Amortización")?;
        writeln!(self.writer, "---------------------------")?;
        writeln!(
            self.writer,
            "Responda las siguientes preguntas para calcular su plan de pagos mensuales.\n"
        )?;

        match reference {
            RateReference::Found(rate) => writeln!(
                self.writer,
                "Tasa de usura de referencia: {} ({})\n",
                format_percent(rate.rate_percent, 2),
                rate.source_url
            )?,
            RateReference::Unavailable => writeln!(
                self.writer,
                "No fue posible consultar la tasa de usura; ingrese la tasa manualmente.\n"
            )?,
            RateReference::NotRequested => {}
        }

        let loan = LoanInput {
            annual_rate_percent: self.ask("Tasa de interés anual (%)", DEFAULT_RATE_PERCENT, parse_rate)?,
            principal: self.ask("Monto del préstamo", DEFAULT_PRINCIPAL, parse_principal)?,
            term_months: self.ask("Plazo (meses)", DEFAULT_TERM_MONTHS, parse_term)?,
        };

        writeln!(self.writer, "\nCalculando el plan de amortización...\n")?;

        let output = match amortization::amortize(&loan) {
            Ok(output) => output,
            Err(e) => {
                writeln!(self.writer, "Error al calcular: {e}")?;
                writeln!(self.writer, "Por favor verifica que todos los datos sean correctos.")?;
                return Ok(SessionOutcome {
                    loan,
                    computed: false,
                    saved_to: None,
                });
            }
        };

        let display = serde_json::to_value(output.result.rounded(CURRENCY_DP))?;
        if let (Some(summary), Some(rows)) = (
            display.get("summary").and_then(|v| v.as_object()),
            display.get("schedule").and_then(|v| v.as_array()),
        ) {
            writeln!(self.writer, "{}\n", render_summary(summary))?;
            writeln!(self.writer, "{}", render_schedule(rows))?;
        }
        for w in &output.warnings {
            writeln!(self.writer, "Aviso: {w}")?;
        }

        let mut saved_to = None;
        if self.confirm("\n¿Desea guardar el plan de amortización en un archivo Excel? Y/N: ")? {
            let target = save_dir.join(DEFAULT_XLSX_FILE_NAME);
            match xlsx::save_plan_xlsx(&output.result.plan(), &target) {
                Ok(written) => {
                    let shown = written.canonicalize().unwrap_or_else(|_| written.clone());
                    writeln!(
                        self.writer,
                        "El plan de amortización ha sido guardado en: {}",
                        shown.display()
                    )?;
                    saved_to = Some(written);
                }
                Err(e) => writeln!(self.writer, "No fue posible guardar el archivo: {e}")?,
            }
        } else {
            writeln!(self.writer, "No se guardó el archivo.")?;
        }

        Ok(SessionOutcome {
            loan,
            computed: true,
            saved_to,
        })
    }

    /// Ask until the answer parses; an empty answer takes the default.
    fn ask<T: Display + Copy>(
        &mut self,
        label: &str,
        default: T,
        parse: fn(&str) -> Result<T, String>,
    ) -> io::Result<T> {
        loop {
            write!(self.writer, "{label} [{default}]: ")?;
            self.writer.flush()?;

            let line = self
                .read_line()?
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"))?;
            let answer = line.trim();
            if answer.is_empty() {
                return Ok(default);
            }
            match parse(answer) {
                Ok(value) => return Ok(value),
                Err(msg) => writeln!(self.writer, "  {msg}")?,
            }
        }
    }

    /// Yes on `y`/`s`/`si`; anything else, including closed input, is no.
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.writer, "{question}")?;
        self.writer.flush()?;
        let answer = self.read_line()?.unwrap_or_default().trim().to_lowercase();
        Ok(matches!(answer.as_str(), "y" | "yes" | "s" | "si" | "sí"))
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf))
    }
}

/// A single comma is taken as the decimal separator unless it reads as a
/// thousands group (`10,000`), which is refused rather than guessed.
fn parse_decimal(answer: &str) -> Result<Decimal, String> {
    let invalid = || format!("'{answer}' no es un número válido");
    let normalized = match answer.split_once(',') {
        None => answer.to_string(),
        Some((whole, fraction)) => {
            let grouped = fraction.len() == 3 && fraction.chars().all(|c| c.is_ascii_digit());
            if grouped || answer.contains('.') || fraction.contains(',') {
                return Err(format!(
                    "{}; escriba el monto sin separadores de miles",
                    invalid()
                ));
            }
            format!("{whole}.{fraction}")
        }
    };
    Decimal::from_str(&normalized).map_err(|_| invalid())
}

fn parse_rate(answer: &str) -> Result<Decimal, String> {
    let rate = parse_decimal(answer)?;
    if rate < MIN_RATE_PERCENT || rate > MAX_RATE_PERCENT {
        return Err(format!(
            "La tasa debe estar entre {MIN_RATE_PERCENT} y {MAX_RATE_PERCENT}"
        ));
    }
    Ok(rate)
}

fn parse_principal(answer: &str) -> Result<Decimal, String> {
    let principal = parse_decimal(answer)?;
    if principal < MIN_PRINCIPAL {
        return Err(format!("El monto debe ser al menos {MIN_PRINCIPAL}"));
    }
    Ok(principal)
}

fn parse_term(answer: &str) -> Result<u32, String> {
    let term: u32 = answer
        .parse()
        .map_err(|_| format!("'{answer}' no es un número entero de meses"))?;
    if term == 0 || term > MAX_TERM_MONTHS {
        return Err(format!("El plazo debe estar entre 1 y {MAX_TERM_MONTHS} meses"));
    }
    Ok(term)
}
