use dto_writer_core::{
    analyze, generate_source_code, AppError, GenerationOptions, MapperStrategy,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const PERSON: &str = r#"using System;
using System.Collections.Generic;

namespace Shop.Models
{
    public class Person
    {
        public int Id { get; private set; }
        public string Name { get; set; }
        public List<Address> Addresses { get; set; }
        public int[] Scores { get; set; }
        public Status Status { get; set; }
        public Wallet Wallet { get; set; }

        public string DisplayName() => Name;
    }
}
"#;

const ADDRESS: &str = r#"namespace Shop.Models
{
    public class Address
    {
        public string Street { get; set; }
    }
}
"#;

const STATUS: &str = "namespace Shop.Models;\n\npublic enum Status\n{\n    Active,\n    Closed,\n}\n";

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_generate_from_project_files() {
    let dir = tempfile::tempdir().unwrap();
    let person = write(dir.path(), "Person.cs", PERSON);
    let others = vec![
        write(dir.path(), "Address.cs", ADDRESS),
        write(dir.path(), "Status.cs", STATUS),
    ];

    let model = analyze(&person, &others, |_| {}).unwrap();
    let code = generate_source_code(&model);

    let expected = r#"using System;
using System.Collections.Generic;
using System.Linq;

namespace Shop.Models.Dto
{
    public class PersonDto
    {
        public int Id { get; private set; }

        public string Name { get; set; }

        public List<AddressDto> Addresses { get; set; }

        public int[] Scores { get; set; }

        public Status Status { get; set; }

        public Wallet Wallet { get; set; }

        public static PersonDto FromModel(Person model)
        {
            return new PersonDto
            {
                Id = model.Id,
                Name = model.Name,
                Addresses = model.Addresses.Select(AddressDto.FromModel).ToList(),
                Scores = model.Scores.ToArray(),
                Status = model.Status,
                // TODO: Add mapping for Wallet
            };
        }

        public Person ToModel()
        {
            return new Person
            {
                Name = Name,
                Addresses = Addresses.Select(dto => dto.ToModel()).ToList(),
                Scores = Scores.ToArray(),
                Status = Status,
                // TODO: Add mapping for Wallet
            };
        }
    }
}
"#;
    assert_eq!(code, expected);
    assert_eq!(generate_source_code(&model), code);
}

#[test]
fn test_progress_counts_reads_and_parses() {
    let dir = tempfile::tempdir().unwrap();
    let person = write(dir.path(), "Person.cs", PERSON);
    let others = vec![
        write(dir.path(), "Address.cs", ADDRESS),
        write(dir.path(), "Status.cs", STATUS),
        write(dir.path(), "Empty.cs", "// nothing here\n"),
    ];

    let seen = Mutex::new(Vec::new());
    analyze(&person, &others, |n| seen.lock().unwrap().push(n)).unwrap();

    let mut seen = seen.into_inner().unwrap();
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_strategies_from_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let person = write(dir.path(), "Person.cs", PERSON);
    let others = vec![write(dir.path(), "Address.cs", ADDRESS)];

    let model = analyze(&person, &others, |_| {}).unwrap();
    let strategies: Vec<_> = model.classes[0]
        .properties
        .iter()
        .map(|p| p.mapper.strategy.clone())
        .collect();
    assert_eq!(
        strategies,
        vec![
            MapperStrategy::Simple,
            MapperStrategy::Simple,
            MapperStrategy::List {
                element_dto: "AddressDto".into()
            },
            MapperStrategy::SimpleArray,
            // `Status.cs` was not supplied.
            MapperStrategy::Unknown,
            MapperStrategy::Unknown,
        ]
    );
}

#[test]
fn test_options_file_shapes_output() {
    let dir = tempfile::tempdir().unwrap();
    let model_file = write(
        dir.path(),
        "User.cs",
        "namespace Accounts { public class User { public int UserId { get; set; } public string Secret { get; set; } } }",
    );
    let options = write(
        dir.path(),
        "dto.yaml",
        "defaults:\n  json_property: true\n  to_model: false\nclasses:\n  User:\n    disabled_properties: [Secret]\n",
    );

    let model = analyze(&model_file, &Vec::<PathBuf>::new(), |_| {}).unwrap();
    let opts = GenerationOptions::from_path(&options).unwrap();
    let code = generate_source_code(&opts.apply(&model));

    let expected = r#"using System;
using Newtonsoft.Json;

namespace Accounts.Dto
{
    public class UserDto
    {
        [JsonProperty("userId")]
        public int UserId { get; set; }

        public static UserDto FromModel(User model)
        {
            return new UserDto
            {
                UserId = model.UserId,
            };
        }
    }
}
"#;
    assert_eq!(code, expected);
}

#[test]
fn test_failures() {
    let dir = tempfile::tempdir().unwrap();
    let no_ns = write(dir.path(), "Loose.cs", "public class Loose { }");
    let broken = write(dir.path(), "Broken.cs", "namespace A { public class B { public int X { get; set; }");
    let ok = write(dir.path(), "Ok.cs", "namespace A { public class C { } }");
    let none: Vec<PathBuf> = Vec::new();

    let err = analyze(&no_ns, &none, |_| {}).unwrap_err();
    assert!(matches!(err, AppError::MissingNamespace(_)));

    let err = analyze(&broken, &none, |_| {}).unwrap_err();
    assert!(matches!(err, AppError::Parse { .. }));

    let err = analyze(&ok, &[broken.clone()], |_| {}).unwrap_err();
    assert!(matches!(err, AppError::Parse { .. }));

    let err = analyze(dir.path().join("Missing.cs"), &none, |_| {}).unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
}
