//! Interactive text menu.
//!
//! The menu reads from any [`BufRead`] and writes to any [`Write`], so the whole conversation
//! can be scripted in tests. Every prompt that needs a specific answer (hospital, severity,
//! covid flag, patient ID) re-asks until it gets one. After each option the registry is saved
//! to the final-state snapshot; a failed save is reported and the menu carries on.
//!
//! End of input behaves like typing `exit`.

use crate::table::patient_table;
use bedtrack_core::{save_registry, PatientId, Registry, Severity, StatusChange, WardError};
use bedtrack_types::parse_covid_flag;
use rand::Rng;
use std::io::{self, BufRead, ErrorKind, Write};
use std::path::PathBuf;

const BANNER: &str = "\
             ---------------------------------------------------------------------
             -                                                                   -
             -                     Hospital Bed Tracker                          -
             -                                                                   -
             ---------------------------------------------------------------------";

pub struct Menu<R, W, G> {
    input: R,
    output: W,
    registry: Registry,
    save_path: PathBuf,
    rng: G,
}

impl<R: BufRead, W: Write, G: Rng> Menu<R, W, G> {
    pub fn new(input: R, output: W, registry: Registry, save_path: PathBuf, rng: G) -> Self {
        Self {
            input,
            output,
            registry,
            save_path,
            rng,
        }
    }

    pub fn into_registry(self) -> Registry {
        self.registry
    }

    /// Runs until the user types `exit` or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "{BANNER}")?;
        self.print_menu()?;
        write!(self.output, "Type in the number here: ")?;
        self.output.flush()?;

        loop {
            let Some(option) = self.next_line()? else {
                break;
            };
            if option.eq_ignore_ascii_case("exit") {
                break;
            }

            let result = match option.as_str() {
                "1" => self.add_patient(),
                "2" => self.transfer_patient(),
                "3" => self.discharge_patient(),
                "4" => self.update_status(),
                _ => {
                    writeln!(
                        self.output,
                        "That was an invalid option! Please try again by typing a number from 1 - 4 \
                         that corresponds to one of the options or type \"exit\" to exit the program."
                    )?;
                    continue;
                }
            };
            match result {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            }

            self.save()?;
            writeln!(self.output, "\nYou will now be returned to the main menu.")?;
            self.print_menu()?;
        }

        writeln!(self.output, "The program has now stopped!")?;
        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "Please select from one of the following options by typing in the number:"
        )?;
        writeln!(self.output, "     1. Add a new patient.")?;
        writeln!(self.output, "     2. Transfer a patient to another hospital.")?;
        writeln!(self.output, "     3. Request to discharge a patient.")?;
        writeln!(self.output, "     4. Update the Severity status of a patient.")?;
        writeln!(self.output, "     Type in \"exit\" to stop this program.")
    }

    fn save(&mut self) -> io::Result<()> {
        match save_registry(&self.save_path, &self.registry) {
            Ok(()) => writeln!(self.output, "The system has now saved its state!"),
            Err(e) => {
                tracing::warn!("failed to save {}: {}", self.save_path.display(), e);
                writeln!(self.output, "The system could not save its state: {e}")
            }
        }
    }

    // ------------------------------------------------------------------
    // Options
    // ------------------------------------------------------------------

    fn add_patient(&mut self) -> io::Result<()> {
        let available = self.available_except(None);
        if available.is_empty() {
            return self.no_hospitals_available();
        }

        writeln!(
            self.output,
            "The following hospitals are available to admit a new patient, please choose one of them \
             by typing out the name of the hospital:\n"
        )?;
        let hospital = self.choose_hospital(&available)?;

        writeln!(
            self.output,
            "Please enter the Severity status of the patient (Must be 0, 1, 2 or 3):"
        )?;
        let severity = self.read_severity()?;

        writeln!(
            self.output,
            "Please enter \"True\" if the patient is Covid positive, otherwise enter \"False\":"
        )?;
        let covid = self.read_covid_flag()?;

        match self
            .registry
            .admit(&hospital, severity, covid, &mut self.rng)
        {
            Ok(id) => {
                let name = self.display_name(&hospital);
                writeln!(
                    self.output,
                    "Patient {id} successfully added to the {name} hospital."
                )
            }
            Err(e) => self.report_error(e),
        }
    }

    fn transfer_patient(&mut self) -> io::Result<()> {
        let id = self.ask_for_patient("transfer")?;
        let Some(owner) = self.registry.find_owner(id) else {
            return self.report_error(WardError::PatientNotFound(id.to_string()));
        };
        let current = owner.key().as_str().to_string();
        let severity = owner.get(id).map(|p| p.severity());

        if severity == Some(Severity::Critical) {
            writeln!(
                self.output,
                "This patient has a severity status of 3, and therefore cannot be transferred."
            )?;
            return match self.registry.lowest_severity_patient(&current) {
                Ok(Some(suggestion)) => writeln!(
                    self.output,
                    "The system suggests that you transfer patient {suggestion} as they have the \
                     lowest severity status currently."
                ),
                Ok(None) => writeln!(
                    self.output,
                    "Currently all patients in this hospital are at a severity status of level 3. \
                     Therefore, it is not possible to transfer any patients from here!"
                ),
                Err(e) => self.report_error(e),
            };
        }

        let available = self.available_except(Some(&current));
        if available.is_empty() {
            return self.no_hospitals_available();
        }
        writeln!(
            self.output,
            "The following hospitals are available to accept a transfer, please choose one of them \
             by typing out the name of the hospital:\n"
        )?;
        let destination = self.choose_hospital(&available)?;

        match self.registry.transfer(id, &destination) {
            Ok(()) => {
                let name = self.display_name(&destination);
                writeln!(
                    self.output,
                    "Patient transferred successfully to the {name} hospital."
                )
            }
            Err(e) => self.report_error(e),
        }
    }

    fn discharge_patient(&mut self) -> io::Result<()> {
        let id = self.ask_for_patient("discharge")?;
        match self.registry.discharge(id) {
            Ok(patient) => writeln!(
                self.output,
                "Patient {} has been discharged from the {} hospital.",
                id,
                patient.hospital_name().display_name()
            ),
            Err(WardError::DischargeBlocked { id, severity }) => writeln!(
                self.output,
                "A patient can only be discharged if they have a severity status of 0, {id} has a \
                 severity status of {severity}."
            ),
            Err(e) => self.report_error(e),
        }
    }

    fn update_status(&mut self) -> io::Result<()> {
        let id = self.ask_for_patient("update the severity status of")?;
        writeln!(
            self.output,
            "Please enter the new severity status of the patient (Must be 0, 1, 2 or 3):"
        )?;
        let severity = self.read_severity()?;

        match self.registry.update_status(id, severity) {
            Ok(change) => {
                if let StatusChange::Unchanged(current) = change {
                    writeln!(self.output, "The patient already has a status of {current}")?;
                }
                writeln!(self.output, "The status of {id} has been successfully updated.")
            }
            Err(e) => self.report_error(e),
        }
    }

    // ------------------------------------------------------------------
    // Prompts
    // ------------------------------------------------------------------

    /// Next trimmed input line, or `None` at end of input.
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like [`Menu::next_line`], but end of input inside an option aborts it.
    fn answer(&mut self) -> io::Result<String> {
        self.output.flush()?;
        self.next_line()?
            .ok_or_else(|| io::Error::new(ErrorKind::UnexpectedEof, "input closed"))
    }

    fn ask_for_patient(&mut self, action: &str) -> io::Result<PatientId> {
        writeln!(
            self.output,
            "Here is a list of patients at their respective hospitals:"
        )?;
        write!(self.output, "{}", patient_table(&self.registry))?;
        writeln!(
            self.output,
            "Please enter the ID of the patient that you want to {action}:"
        )?;

        loop {
            let input = self.answer()?;
            match self.registry.resolve_id(&input) {
                Ok(id) => return Ok(id),
                Err(_) => writeln!(
                    self.output,
                    "This patient ID does not exist, please make sure the ID consists of 3 numbers \
                     followed by a letter."
                )?,
            }
        }
    }

    fn choose_hospital(&mut self, available: &[String]) -> io::Result<String> {
        for name in available {
            let beds = self
                .registry
                .hospital(name)
                .map(|h| h.available_beds())
                .unwrap_or_default();
            let display = self.display_name(name);
            writeln!(self.output, "{display} -> Beds available: {beds}")?;
        }

        write!(
            self.output,
            "\nType in the name of the hospital you want to choose here: "
        )?;
        loop {
            let choice = self.answer()?;
            if let Some(name) = available.iter().find(|n| n.eq_ignore_ascii_case(&choice)) {
                return Ok(name.clone());
            }
            writeln!(
                self.output,
                "Please type the name of one of the hospitals from the available hospitals!"
            )?;
            write!(self.output, "\nPlease try again: ")?;
        }
    }

    fn read_severity(&mut self) -> io::Result<Severity> {
        loop {
            let input = self.answer()?;
            match input.parse::<Severity>() {
                Ok(severity) => return Ok(severity),
                Err(_) => {
                    let allowed: Vec<String> = Severity::ALL.iter().map(|s| s.to_string()).collect();
                    writeln!(
                        self.output,
                        "There was a problem with your input, please try again \
                         (Severity status must be {}):",
                        join_choices(&allowed)
                    )?;
                }
            }
        }
    }

    fn read_covid_flag(&mut self) -> io::Result<bool> {
        loop {
            let input = self.answer()?;
            match parse_covid_flag(&input) {
                Ok(flag) => return Ok(flag),
                Err(_) => writeln!(
                    self.output,
                    "There was a problem with your input, please try again \
                     (Covid status must be either \"True\" or \"False\"):"
                )?,
            }
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn available_except(&self, current: Option<&str>) -> Vec<String> {
        self.registry
            .available_hospitals()
            .into_iter()
            .filter(|name| Some(*name) != current)
            .map(str::to_string)
            .collect()
    }

    fn display_name(&self, key: &str) -> String {
        self.registry
            .hospital(key)
            .map(|h| h.name())
            .unwrap_or_else(|| key.to_string())
    }

    fn no_hospitals_available(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "Sorry, there are currently no hospitals that can admit new patients! \
             A patient needs to be discharged first to proceed further."
        )
    }

    fn report_error(&mut self, e: WardError) -> io::Result<()> {
        writeln!(self.output, "{e}")
    }
}

/// `["0", "1", "2"]` -> `"0, 1 or 2"`.
fn join_choices(choices: &[String]) -> String {
    match choices {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}
