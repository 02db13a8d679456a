//! Interactive worker menu.
//!
//! # Responsibility
//! - Read operator input line by line and dispatch to `WorkerService`.
//! - Report validation, not-found, duplicate and storage outcomes without
//!   leaving the loop.
//!
//! # Invariants
//! - End of input exits the loop cleanly, like option 7.
//! - Only terminal I/O errors escape `run`.

use crewbook_core::{
    validate_age, validate_id, validate_name, validate_salary, validate_weekly_hours,
    ValidationError, Worker, WorkerRepository, WorkerService,
};
use std::io::{self, BufRead, Write};

const MENU: &str = "\
Menu de gestion de colaboradores
1. Crear colaborador tiempo completo
2. Crear colaborador tiempo parcial
3. Buscar colaborador
4. Actualizar salario de colaborador
5. Eliminar colaborador
6. Mostrar todos los colaboradores
7. Salir";

enum StepError {
    Eof,
    Io(io::Error),
    Invalid(ValidationError),
}

impl From<io::Error> for StepError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ValidationError> for StepError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

type Step<T> = Result<T, StepError>;

#[derive(Clone, Copy)]
enum NewWorker {
    FullTime,
    PartTime,
}

pub struct Menu<'a, R: WorkerRepository, I, O> {
    service: &'a WorkerService<R>,
    input: I,
    output: O,
}

impl<'a, R, I, O> Menu<'a, R, I, O>
where
    R: WorkerRepository,
    I: BufRead,
    O: Write,
{
    pub fn new(service: &'a WorkerService<R>, input: I, output: O) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Runs until the operator picks "exit" or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n{MENU}")?;
            let choice = match self.prompt("Seleccione una opcion: ") {
                Ok(choice) => choice,
                Err(StepError::Io(err)) => return Err(err),
                Err(_) => break,
            };

            let step = match choice.as_str() {
                "1" => self.create(NewWorker::FullTime),
                "2" => self.create(NewWorker::PartTime),
                "3" => self.find(),
                "4" => self.update_salary(),
                "5" => self.delete(),
                "6" => self.list(),
                "7" => break,
                _ => {
                    writeln!(
                        self.output,
                        "Opcion no valida. Seleccione una opcion valida (1-7)"
                    )?;
                    Ok(())
                }
            };

            match step {
                Ok(()) => {}
                Err(StepError::Invalid(err)) => writeln!(self.output, "Error: {err}")?,
                Err(StepError::Eof) => break,
                Err(StepError::Io(err)) => return Err(err),
            }
        }

        writeln!(self.output, "Saliendo del programa...")?;
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> Step<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(StepError::Eof);
        }
        Ok(line.trim().to_string())
    }

    fn create(&mut self, variant: NewWorker) -> Step<()> {
        let id = validate_id(&self.prompt("Ingrese dni: ")?)?;
        let first_name = validate_name("nombre", &self.prompt("Ingrese nombre: ")?)?;
        let last_name = validate_name("apellido", &self.prompt("Ingrese apellido: ")?)?;
        let age = validate_age(&self.prompt("Ingrese edad: ")?)?;
        let salary = validate_salary(&self.prompt("Ingrese salario: ")?)?;

        let worker = match variant {
            NewWorker::FullTime => {
                let department = self.prompt("Ingrese departamento: ")?;
                Worker::full_time(
                    id.get(),
                    &first_name,
                    &last_name,
                    age,
                    salary.get(),
                    department,
                )?
            }
            NewWorker::PartTime => {
                let hours = validate_weekly_hours(&self.prompt("Ingrese horas semanales: ")?)?;
                Worker::part_time(id.get(), &first_name, &last_name, age, salary.get(), hours)?
            }
        };

        match self.service.create(&worker) {
            Ok(id) => writeln!(self.output, "Colaborador {id} creado correctamente")?,
            Err(err) => writeln!(self.output, "Error: {err}")?,
        }
        Ok(())
    }

    fn find(&mut self) -> Step<()> {
        let id = validate_id(&self.prompt("Ingrese el DNI del colaborador a buscar: ")?)?;
        match self.service.read(id) {
            Ok(worker) => writeln!(self.output, "{worker}")?,
            Err(err) => writeln!(self.output, "Error: {err}")?,
        }
        Ok(())
    }

    fn update_salary(&mut self) -> Step<()> {
        let id = validate_id(&self.prompt("Ingrese el DNI del colaborador a actualizar: ")?)?;
        let salary = validate_salary(&self.prompt("Ingrese el nuevo salario: ")?)?;
        match self.service.update_salary(id, salary.get()) {
            Ok(worker) => writeln!(
                self.output,
                "Salario de {id} actualizado a {}",
                worker.salary()
            )?,
            Err(err) => writeln!(self.output, "Error: {err}")?,
        }
        Ok(())
    }

    fn delete(&mut self) -> Step<()> {
        let id = validate_id(&self.prompt("Ingrese el DNI del colaborador a eliminar: ")?)?;
        match self.service.delete(id) {
            Ok(()) => writeln!(self.output, "El colaborador con DNI {id} se elimino correctamente")?,
            Err(err) => writeln!(self.output, "Error: {err}")?,
        }
        Ok(())
    }

    fn list(&mut self) -> Step<()> {
        match self.service.list_all() {
            Ok(workers) => {
                writeln!(self.output, "=== Listado completo de colaboradores ===")?;
                for worker in &workers {
                    writeln!(self.output, "{}", worker.label())?;
                }
                writeln!(self.output, "=== {} colaboradores ===", workers.len())?;
            }
            Err(err) => writeln!(self.output, "Error: {err}")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Menu;
    use crewbook_core::{MemoryWorkerRepository, WorkerId, WorkerService};
    use std::io::Cursor;

    fn run_script(service: &WorkerService<MemoryWorkerRepository>, script: &str) -> String {
        let mut output = Vec::new();
        Menu::new(service, Cursor::new(script.as_bytes()), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn create_update_and_list_through_menu() {
        let service = WorkerService::new(MemoryWorkerRepository::new());
        let output = run_script(
            &service,
            "1\n30111222\nana\nlopez\n29\n1000\nIT\n4\n30111222\n1200\n6\n7\n",
        );

        assert!(output.contains("Colaborador 30111222 creado correctamente"));
        assert!(output.contains("actualizado a 1200.00"));
        assert!(output.contains("Ana Lopez - Departamento: IT"));
        assert!(output.ends_with("Saliendo del programa...\n"));

        let stored = service.read(WorkerId::new(30111222).unwrap()).unwrap();
        assert_eq!(stored.salary().get(), 1200.0);
    }

    #[test]
    fn invalid_input_is_reported_and_loop_continues() {
        let service = WorkerService::new(MemoryWorkerRepository::new());
        let output = run_script(&service, "2\n123\n9\n3\n7654321\n");

        assert!(output.contains("Error: dni must have 7 or 8 digits"));
        assert!(output.contains("Opcion no valida"));
        assert!(output.contains("Error: no worker found with dni 7654321"));
        assert!(output.contains("Saliendo del programa..."));
    }

    #[test]
    fn duplicate_and_missing_delete_are_reported() {
        let service = WorkerService::new(MemoryWorkerRepository::new());
        let output = run_script(
            &service,
            "2\n1234567\nleo\npaz\n40\n300\n20\n2\n1234567\nleo\npaz\n40\n300\n20\n5\n7654321\n7\n",
        );

        assert!(output.contains("Error: a worker with dni 1234567 already exists"));
        assert!(output.contains("Error: no worker found with dni 7654321"));
    }

    #[test]
    fn blank_name_is_rejected_before_anything_is_stored() {
        let service = WorkerService::new(MemoryWorkerRepository::new());
        let output = run_script(&service, "1\n30111222\n   \n7\n");

        assert!(output.contains("Error: nombre must not be empty"));
        assert!(service.list_all().unwrap().is_empty());
    }
}
